use crate::*;

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use futures::executor::block_on;
use futures::future::join_all;
use lazytable::{DataSource, FetchError, FetchResult, PageEntry, PageStatus, Status, page_status};

struct TestSource {
    total: usize,
    calls: Cell<usize>,
    failing: RefCell<BTreeSet<i64>>,
}

impl TestSource {
    fn new(total: usize) -> Self {
        Self {
            total,
            calls: Cell::new(0),
            failing: RefCell::new(BTreeSet::new()),
        }
    }

    fn failing_at(self, index: i64) -> Self {
        self.failing.borrow_mut().insert(index);
        self
    }

    fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl DataSource<usize> for TestSource {
    async fn fetch(&self, index: i64, count: i64) -> Result<FetchResult<usize>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        if index < 0 || count < 0 || index as usize >= self.total {
            return Err(FetchError::OutOfRange { index, count });
        }
        if self.failing.borrow().contains(&index) {
            return Err(FetchError::Unavailable(format!("offset {index} is down")));
        }
        let from = index as usize;
        let len = (count as usize).min(self.total - from);
        Ok(FetchResult {
            from,
            items: (from..from + len).collect(),
            total_count: self.total,
        })
    }
}

fn page_keys(c: &Controller<usize, TestSource>) -> Vec<usize> {
    c.state()
        .data()
        .map(|d| d.pages.keys().copied().collect())
        .unwrap_or_default()
}

#[test]
fn controller_waits_for_measurement_before_loading() {
    let mut c = Controller::new(TestSource::new(1000), ControllerOptions::new(100));
    block_on(c.settle());
    assert_eq!(c.state().status(), Status::Loading);
    assert_eq!(c.source().calls(), 0);
    assert!(c.items().is_empty());

    c.set_item_height(10);
    block_on(c.settle());
    assert_eq!(c.state().status(), Status::Loaded);
    let data = c.state().data().unwrap();
    assert_eq!(data.page_size, 20);
    assert_eq!(data.total_count, 1000);
    assert_eq!(page_keys(&c), [0, 1]);
    assert_eq!(c.source().calls(), 2);
    assert_eq!(c.items(), (0..20).map(Some).collect::<Vec<_>>());
    assert_eq!(c.content_height(), 10_000);
}

#[test]
fn controller_loads_batches_around_scroll_position() {
    let mut c = Controller::new(TestSource::new(1000), ControllerOptions::new(100));
    c.set_item_height(10);
    block_on(c.settle());

    c.on_scroll(455);
    assert_eq!(c.first_index(), 45);
    assert_eq!(c.pixel_offset(), 5);
    // Batch 2 is not loaded yet.
    assert_eq!(c.items()[..15], [None; 15]);

    block_on(c.settle());
    assert_eq!(page_keys(&c), [0, 1, 2, 3]);
    assert_eq!(c.source().calls(), 4);
    assert_eq!(c.items(), (45..65).map(Some).collect::<Vec<_>>());

    // Nothing new to fetch when scrolling back.
    c.on_scroll(0);
    block_on(c.settle());
    assert_eq!(c.source().calls(), 4);
}

#[test]
fn controller_step_marks_batches_before_fetching() {
    let mut c = Controller::new(TestSource::new(1000), ControllerOptions::new(100));
    c.set_item_height(10);

    let loads = c.step();
    assert_eq!(loads.iter().map(PendingLoad::page).collect::<Vec<_>>(), [0, 1]);
    assert_eq!(c.state().status(), Status::Loaded);
    assert!(c.step().is_empty());

    let done = block_on(join_all(loads.into_iter().map(PendingLoad::run)));
    for load in done {
        assert!(load.result().is_ok());
        assert!(c.complete(load));
    }
    assert_eq!(page_keys(&c), [0, 1]);
    assert_eq!(c.source().calls(), 2);
}

#[test]
fn controller_honors_lookahead() {
    let options = ControllerOptions::new(100).with_lookahead(2);
    let mut c = Controller::new(TestSource::new(1000), options);
    c.set_item_height(10);
    c.dispatch(lazytable::Action::Initialize);
    c.dispatch(lazytable::Action::Initialized);
    c.on_scroll(800);

    let loads = c.step();
    assert_eq!(
        loads.iter().map(PendingLoad::page).collect::<Vec<_>>(),
        [2, 3, 4, 5, 6]
    );
}

#[test]
fn failed_batch_stays_loading_and_is_not_refetched() {
    let mut c = Controller::new(
        TestSource::new(1000).failing_at(20),
        ControllerOptions::new(100),
    );
    c.set_item_height(10);
    block_on(c.settle());
    // The first payload replaces the bootstrap markers, so batch 1 is asked for twice: once
    // in the bootstrap pass and once after the first payload lands.
    assert_eq!(c.source().calls(), 3);

    let data = c.state().data().unwrap();
    assert_eq!(page_status(data, 0), PageStatus::Loaded);
    assert_eq!(page_status(data, 1), PageStatus::Loading);
    assert_eq!(c.items(), (0..20).map(Some).collect::<Vec<_>>());

    block_on(c.settle());
    assert_eq!(c.source().calls(), 3);

    c.on_scroll(200);
    block_on(c.settle());
    assert_eq!(c.source().calls(), 4);
    assert_eq!(
        c.state().data().unwrap().pages.get(&1),
        Some(&PageEntry::Loading)
    );
}

#[test]
fn replacing_the_source_resets_and_ignores_stale_loads() {
    let mut c = Controller::new(TestSource::new(1000), ControllerOptions::new(100));
    c.set_item_height(10);
    let stale = c.step();

    c.set_source(TestSource::new(50));
    assert_eq!(c.state().status(), Status::None);
    assert!(c.state().data().is_none());

    let done = block_on(join_all(stale.into_iter().map(PendingLoad::run)));
    for load in done {
        assert!(!c.complete(load));
    }
    assert!(c.state().data().is_none());

    block_on(c.settle());
    assert_eq!(c.state().total_count(), 50);
    assert_eq!(page_keys(&c), [0, 1]);
    assert_eq!(c.source().calls(), 2);
}

#[test]
fn resize_refetches_with_the_new_batch_size() {
    let mut c = Controller::new(TestSource::new(1000), ControllerOptions::new(100));
    c.set_item_height(10);
    block_on(c.settle());
    assert_eq!(c.state().data().unwrap().page_size, 20);

    c.set_viewport_height(50);
    block_on(c.settle());
    let data = c.state().data().unwrap();
    assert_eq!(data.page_size, 10);
    assert_eq!(page_keys(&c), [0, 1]);
    assert_eq!(c.source().calls(), 4);
    assert_eq!(c.items(), (0..10).map(Some).collect::<Vec<_>>());
}

#[test]
fn selection_does_not_trigger_loads() {
    let mut c = Controller::new(TestSource::new(1000), ControllerOptions::new(100));
    c.set_item_height(10);
    block_on(c.settle());

    c.on_click(5);
    c.on_hover(7);
    assert_eq!(c.state().selected(), Some(5));
    assert_eq!(c.state().hovered(), Some(7));
    assert!(c.step().is_empty());
}

#[test]
fn empty_collection_loads_nothing_more() {
    let mut c = Controller::new(TestSource::new(0), ControllerOptions::new(100));
    c.set_item_height(10);
    block_on(c.settle());
    assert_eq!(c.state().status(), Status::Loaded);
    assert!(c.state().data().is_some_and(|d| d.pages.values().all(PageEntry::is_loading)));
    assert!(c.items().is_empty());
    assert_eq!(c.content_height(), 0);
}

#[test]
fn pager_starts_with_single_item_pages() {
    let p = Pager::new(TestSource::new(1234));
    assert_eq!(p.page_size(), 1);
    assert_eq!(block_on(p.cache().at(134)), Ok(134));
    assert_eq!(p.count(), 1234);
}

#[test]
fn pager_follows_offset_and_page_size() {
    let mut p = Pager::new(TestSource::new(1234));
    block_on(p.refresh());
    assert_eq!(p.offset(), 0);
    assert_eq!(p.items(), [Some(0)]);

    p.set_offset(19);
    assert_eq!(p.items(), [None]);
    block_on(p.refresh());
    assert_eq!(p.window().offset, 19);
    assert_eq!(p.items(), [Some(19)]);

    assert!(p.set_page_size(NonZeroUsize::new(3).unwrap()));
    assert!(!p.set_page_size(NonZeroUsize::new(3).unwrap()));
    assert_eq!(p.page_size(), 3);
    block_on(p.refresh());
    assert_eq!(p.items(), [Some(19), Some(20), Some(21)]);

    // Sliding reuses the loaded window until the next refresh.
    p.set_offset(20);
    assert_eq!(p.items(), [Some(20), Some(21), None]);
    p.set_offset(18);
    assert_eq!(p.items(), [None, Some(19), Some(20)]);
}

#[test]
fn pager_ignores_negative_offsets() {
    let mut p = Pager::new(TestSource::new(10));
    p.set_offset(-4);
    block_on(p.refresh());
    assert!(p.window().is_empty());
    assert_eq!(p.cache().source().calls(), 0);

    let w = block_on(p.fetch_window());
    assert_eq!(w, lazytable::Window::empty(-4));
    p.set_window(w);
    assert!(p.items().is_empty());
}
