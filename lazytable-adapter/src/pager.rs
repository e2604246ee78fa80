use std::future::Future;
use std::num::NonZeroUsize;
use std::rc::Rc;

use lazytable::{DataSource, PageCache, Window, slide_items};

/// A single window over a lazily paginated collection.
///
/// The window is `page_size` items long and starts at `offset`. Moving the offset does not
/// fetch; [`Pager::items`] keeps showing the overlapping part of the last loaded window (with
/// `None` elsewhere) until [`Pager::refresh`] loads the new one.
///
/// A new pager starts with a page size of 1. Changing the page size replaces the page cache:
/// pages fetched for one size are never reused for another.
pub struct Pager<T, S> {
    cache: PageCache<T, S>,
    offset: i64,
    window: Window<T>,
}

impl<T, S> Pager<T, S>
where
    T: Clone + 'static,
    S: DataSource<T> + 'static,
{
    pub fn new(source: S) -> Self {
        Self::from_shared(Rc::new(source))
    }

    pub fn from_shared(source: Rc<S>) -> Self {
        Self {
            cache: PageCache::from_shared(NonZeroUsize::MIN, source),
            offset: 0,
            window: Window::empty(0),
        }
    }

    pub fn cache(&self) -> &PageCache<T, S> {
        &self.cache
    }

    pub fn page_size(&self) -> usize {
        self.cache.page_size()
    }

    /// Total item count reported by the source so far.
    pub fn count(&self) -> usize {
        self.cache.count()
    }

    /// Returns `true` when the page size changed (and the cache was replaced).
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) -> bool {
        if page_size.get() == self.cache.page_size() {
            return false;
        }
        self.cache = PageCache::from_shared(page_size, self.cache.shared_source());
        true
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// The last loaded window.
    pub fn window(&self) -> &Window<T> {
        &self.window
    }

    /// The last loaded window realigned to the current offset.
    pub fn items(&self) -> Vec<Option<T>> {
        slide_items(self.offset, &self.window)
    }

    /// Fetches the window at the current offset without touching the pager.
    ///
    /// Pair with [`Pager::set_window`] when the pager cannot stay borrowed during the fetch.
    pub fn fetch_window(&self) -> impl Future<Output = Window<T>> + use<T, S> {
        self.cache.slice(self.offset, self.page_size() as i64)
    }

    pub fn set_window(&mut self, window: Window<T>) {
        self.window = window;
    }

    /// Loads the window at the current offset. A negative offset keeps the current window.
    pub async fn refresh(&mut self) {
        if self.offset < 0 {
            return;
        }
        self.window = self.fetch_window().await;
    }
}

impl<T, S> std::fmt::Debug for Pager<T, S>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("cache", &self.cache)
            .field("offset", &self.offset)
            .field("window", &self.window)
            .finish()
    }
}
