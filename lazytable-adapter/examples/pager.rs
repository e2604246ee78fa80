// Example: a sliding pager that keeps showing stale rows while the next window loads.
use std::num::NonZeroUsize;

use futures::executor::block_on;
use lazytable::{FetchError, FetchResult};
use lazytable_adapter::Pager;

fn main() {
    let mut pager: Pager<i64, _> = Pager::new(|index: i64, count: i64| async move {
        if index < 0 || count < 0 || index >= 500 {
            return Err(FetchError::OutOfRange { index, count });
        }
        let end = (index + count).min(500);
        Ok(FetchResult {
            from: index as usize,
            items: (index..end).collect::<Vec<i64>>(),
            total_count: 500,
        })
    });
    pager.set_page_size(NonZeroUsize::new(5).unwrap());

    pager.set_offset(40);
    block_on(pager.refresh());
    println!("offset=40 items={:?}", pager.items());

    pager.set_offset(42);
    println!("offset=42 before refresh={:?}", pager.items());
    block_on(pager.refresh());
    println!("offset=42 after refresh={:?} count={}", pager.items(), pager.count());
}
