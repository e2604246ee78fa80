// Example: lazily slicing a large collection through a page cache.
use std::cell::Cell;
use std::num::NonZeroUsize;

use futures::executor::block_on;
use lazytable::{DataSource, FetchError, FetchResult, PageCache, slide_items};

/// One million numbered rows that pretend to live behind a remote API.
struct Rows {
    fetches: Cell<usize>,
}

impl DataSource<String> for Rows {
    async fn fetch(&self, index: i64, count: i64) -> Result<FetchResult<String>, FetchError> {
        const TOTAL: usize = 1_000_000;
        self.fetches.set(self.fetches.get() + 1);
        if index < 0 || count < 0 || index as usize >= TOTAL {
            return Err(FetchError::OutOfRange { index, count });
        }
        let from = index as usize;
        let to = (from + count as usize).min(TOTAL);
        Ok(FetchResult {
            from,
            items: (from..to).map(|i| format!("row #{i}")).collect(),
            total_count: TOTAL,
        })
    }
}

fn main() {
    let cache: PageCache<String, Rows> = PageCache::new(
        NonZeroUsize::new(25).unwrap(),
        Rows {
            fetches: Cell::new(0),
        },
    );

    let window = block_on(cache.slice(123_450, 10));
    println!("count={} window={:?}", cache.count(), window.items);

    // Scroll down by three rows: reuse what we have, placeholders for the rest.
    let shown = slide_items(123_453, &window);
    println!("slid={shown:?}");

    let window = block_on(cache.slice(123_453, 10));
    println!("refreshed={:?}", window.items);
    println!("fetches={}", cache.source().fetches.get());
}
