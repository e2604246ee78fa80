use std::fmt;
use std::mem;
use std::num::NonZeroUsize;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use lazytable::{
    Action, Data, DataSource, Error, Geometry, PageCache, Plan, Selection, State, fetch_pages,
    plan, window_items,
};

use crate::ControllerOptions;

/// A framework-neutral driver for the table reducer.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_click` / `on_hover` when UI events occur
/// - `set_item_height` once an item has been measured, `set_viewport_height` on resize
/// - `set_source` when the data source is replaced
/// - `step` (or `settle`) after every state change, awaiting the returned loads and feeding
///   them back through `complete`
///
/// Fetches go through a [`PageCache`] whose page size is the current batch size, so a batch is
/// never fetched twice while it is in flight. A resize that changes the batch size starts a
/// new cache; the old pages are dropped by the reducer once the first payload of the new size
/// arrives.
pub struct Controller<T, S> {
    source: Rc<S>,
    cache: Option<PageCache<T, S>>,
    state: State<T>,
    options: ControllerOptions,
    item_height: u32,
    /// Bumped on every source change; loads from older sources are ignored.
    generation: u64,
}

impl<T, S> Controller<T, S>
where
    T: Clone + 'static,
    S: DataSource<T> + 'static,
{
    pub fn new(source: S, options: ControllerOptions) -> Self {
        Self {
            source: Rc::new(source),
            cache: None,
            state: State::new(),
            options,
            item_height: 0,
            generation: 0,
        }
    }

    pub fn state(&self) -> &State<T> {
        &self.state
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.options.viewport_height, self.item_height)
    }

    /// Replaces the data source and resets all state, cached pages included.
    pub fn set_source(&mut self, source: S) {
        self.source = Rc::new(source);
        self.cache = None;
        self.generation = self.generation.wrapping_add(1);
        self.dispatch(Action::Reset);
    }

    pub fn set_viewport_height(&mut self, viewport_height: u32) {
        self.options.viewport_height = viewport_height;
    }

    pub fn set_lookahead(&mut self, lookahead: usize) {
        self.options.lookahead = lookahead;
    }

    /// Reports the measured item height. Zero means "not measured".
    pub fn set_item_height(&mut self, item_height: u32) {
        self.item_height = item_height;
    }

    pub fn on_scroll(&mut self, scroll_top: u64) {
        self.dispatch(Action::Scroll { scroll_top });
    }

    pub fn on_click(&mut self, index: usize) {
        self.dispatch(Action::Select {
            selection: Selection::Click,
            index,
        });
    }

    pub fn on_hover(&mut self, index: usize) {
        self.dispatch(Action::Select {
            selection: Selection::Hover,
            index,
        });
    }

    pub fn dispatch(&mut self, action: Action<T>) {
        let state = mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    /// Runs the planner until it is idle and returns the batch loads it started.
    ///
    /// Every returned batch is already marked `Loading` in the state, so calling `step` again
    /// before the loads finish returns nothing new.
    pub fn step(&mut self) -> Vec<PendingLoad<T>> {
        let mut loads = Vec::new();
        // Initialize, Initialized and Load each need one pass; the last pass sees Idle.
        for _ in 0..4 {
            match plan(&self.state, self.geometry(), self.options.lookahead) {
                Plan::Idle => break,
                Plan::Initialize => self.dispatch(Action::Initialize),
                Plan::Initialized => self.dispatch(Action::Initialized),
                Plan::Load(pages) => {
                    let Some(cache) = self.cache_for_batch() else {
                        break;
                    };
                    atrace!(?pages, generation = self.generation, "starting batch loads");
                    self.dispatch(Action::Load {
                        pages: pages.clone(),
                    });
                    loads.extend(pages.into_iter().map(|page| PendingLoad {
                        generation: self.generation,
                        page,
                        fetch: fetch_pages(&cache, page, 1).boxed_local(),
                    }));
                }
            }
        }
        loads
    }

    /// Applies a finished load. Returns `true` when it changed the state.
    ///
    /// Loads started before the last `set_source` are ignored. A failed load leaves its batch
    /// `Loading`; it is not requested again until a geometry change drops the marker.
    pub fn complete(&mut self, load: CompletedLoad<T>) -> bool {
        if load.generation != self.generation {
            adebug!(page = load.page, "dropping load from a replaced source");
            return false;
        }
        let Ok(data) = load.result else {
            awarn!(page = load.page, "batch failed to load, leaving it loading");
            return false;
        };
        self.dispatch(Action::Loaded { data });
        true
    }

    /// Steps and completes loads until the planner has nothing left to do.
    pub async fn settle(&mut self) {
        loop {
            let loads = self.step();
            if loads.is_empty() {
                return;
            }
            let done = join_all(loads.into_iter().map(PendingLoad::run)).await;
            for load in done {
                self.complete(load);
            }
        }
    }

    /// Index of the item at the top of the viewport.
    pub fn first_index(&self) -> usize {
        self.geometry().first_index(self.state.scroll_top())
    }

    /// Sub-item offset to apply to the rendered items.
    pub fn pixel_offset(&self) -> u32 {
        self.geometry().pixel_offset(self.state.scroll_top())
    }

    /// Height of the scrollable content.
    pub fn content_height(&self) -> u64 {
        self.geometry().content_height(self.state.total_count())
    }

    /// The items to render from `first_index`, `None` where not loaded yet.
    pub fn items(&self) -> Vec<Option<T>> {
        match self.state.data() {
            Some(data) if self.geometry().is_measured() => window_items(self.first_index(), data),
            _ => Vec::new(),
        }
    }

    /// Returns a cache for the current batch size, replacing the old one if the size changed.
    fn cache_for_batch(&mut self) -> Option<PageCache<T, S>> {
        let batch_size = NonZeroUsize::new(self.geometry().batch_size())?;
        match &self.cache {
            Some(cache) if cache.page_size() == batch_size.get() => Some(cache.clone()),
            _ => {
                adebug!(batch_size = batch_size.get(), "new page cache");
                let cache = PageCache::from_shared(batch_size, Rc::clone(&self.source));
                self.cache = Some(cache.clone());
                Some(cache)
            }
        }
    }
}

impl<T, S> fmt::Debug for Controller<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("item_height", &self.item_height)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// A batch fetch started by [`Controller::step`].
pub struct PendingLoad<T> {
    generation: u64,
    page: usize,
    fetch: LocalBoxFuture<'static, Result<Data<T>, Error>>,
}

impl<T> PendingLoad<T> {
    /// The batch index being fetched.
    pub fn page(&self) -> usize {
        self.page
    }

    pub async fn run(self) -> CompletedLoad<T> {
        CompletedLoad {
            generation: self.generation,
            page: self.page,
            result: self.fetch.await,
        }
    }
}

impl<T> fmt::Debug for PendingLoad<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("generation", &self.generation)
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}

/// The outcome of a [`PendingLoad`], to be passed to [`Controller::complete`].
#[derive(Debug)]
pub struct CompletedLoad<T> {
    generation: u64,
    page: usize,
    result: Result<Data<T>, Error>,
}

impl<T> CompletedLoad<T> {
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn result(&self) -> &Result<Data<T>, Error> {
        &self.result
    }
}
