// Example: a simulated UI loop driving the controller.
use futures::executor::block_on;
use lazytable::{FetchError, FetchResult};
use lazytable_adapter::{Controller, ControllerOptions};

async fn fetch(index: i64, count: i64) -> Result<FetchResult<String>, FetchError> {
    const TOTAL: usize = 10_000;
    if index < 0 || count < 0 || index as usize >= TOTAL {
        return Err(FetchError::OutOfRange { index, count });
    }
    let from = index as usize;
    let to = (from + count as usize).min(TOTAL);
    Ok(FetchResult {
        from,
        items: (from..to).map(|i| format!("message {i}")).collect(),
        total_count: TOTAL,
    })
}

fn main() {
    let mut c: Controller<String, _> = Controller::new(fetch, ControllerOptions::new(240));

    // The first frame has not measured a row yet.
    block_on(c.settle());
    println!("status={:?}", c.state().status());

    // The renderer measured one row.
    c.set_item_height(16);
    block_on(c.settle());
    println!(
        "status={:?} total={} content_height={}",
        c.state().status(),
        c.state().total_count(),
        c.content_height()
    );

    for scroll_top in [0u64, 500, 4_000, 120_000] {
        c.on_scroll(scroll_top);
        // Render what we have while the next batches load.
        let placeholders = c.items().iter().filter(|it| it.is_none()).count();
        block_on(c.settle());
        let items = c.items();
        println!(
            "scroll_top={scroll_top} first={} pixel_offset={} placeholders_before={placeholders} first_item={:?}",
            c.first_index(),
            c.pixel_offset(),
            items.first()
        );
    }

    c.on_click(c.first_index() + 2);
    println!("selected={:?}", c.state().selected());
}
