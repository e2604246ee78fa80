//! The page cache: lazily fetched, deduplicated pages of a [`DataSource`].
//!
//! Every lookup maps an index to its page key (`index - index % page_size`). The first caller
//! for a key creates one shared fetch future and stores it in the page map *before* anything is
//! awaited; later callers for the same key clone that future instead of fetching again. When the
//! fetch resolves, the slot becomes `Loaded` on success or is removed on failure so the page can
//! be requested again.
//!
//! The cache is single-threaded: handles are `Rc`-backed and the page map sits in a `RefCell`
//! that is never borrowed across an await point.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared, join_all};
use futures::FutureExt;

use crate::{DataSource, Error, FetchError, FetchResult, Window};

/// Upper bound on the pages one [`PageCache::slice`] call registers before awaiting anything.
const MAX_EAGER_PAGES: usize = 64;

/// A fetch in progress, shared by every caller waiting on the same page.
///
/// The result is wrapped in an `Rc` so the future output is cheap to clone.
type PageFetch<T> = Shared<LocalBoxFuture<'static, Result<Rc<FetchResult<T>>, FetchError>>>;

enum Slot<T> {
    Pending(PageFetch<T>),
    Loaded(Rc<FetchResult<T>>),
}

enum Request<T> {
    Ready(Rc<FetchResult<T>>),
    Pending(PageFetch<T>),
}

struct Pages<T> {
    page_size: usize,
    /// `None` until the first fetch completes.
    total_count: Option<usize>,
    slots: HashMap<usize, Slot<T>>,
}

/// A handle to a lazily paginated collection.
///
/// Clones share the same page map. The page size is fixed for the lifetime of the cache: a
/// different page size needs a new cache (see [`PageCache::from_shared`] to keep the source).
///
/// Futures returned by [`PageCache::at`], [`PageCache::slice`] and [`PageCache::page`] hold
/// their own handle and do not borrow the cache.
pub struct PageCache<T, S> {
    source: Rc<S>,
    pages: Rc<RefCell<Pages<T>>>,
}

impl<T, S> Clone for PageCache<T, S> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            pages: Rc::clone(&self.pages),
        }
    }
}

impl<T, S> core::fmt::Debug for PageCache<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let pages = self.pages.borrow();
        f.debug_struct("PageCache")
            .field("page_size", &pages.page_size)
            .field("total_count", &pages.total_count)
            .field("slots", &pages.slots.len())
            .finish_non_exhaustive()
    }
}

impl<T, S> PageCache<T, S>
where
    T: Clone + 'static,
    S: DataSource<T> + 'static,
{
    pub fn new(page_size: NonZeroUsize, source: S) -> Self {
        Self::from_shared(page_size, Rc::new(source))
    }

    /// Creates an empty cache over a source shared with other caches.
    pub fn from_shared(page_size: NonZeroUsize, source: Rc<S>) -> Self {
        ldebug!(page_size = page_size.get(), "PageCache::new");
        Self {
            source,
            pages: Rc::new(RefCell::new(Pages {
                page_size: page_size.get(),
                total_count: None,
                slots: HashMap::new(),
            })),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn shared_source(&self) -> Rc<S> {
        Rc::clone(&self.source)
    }

    pub fn page_size(&self) -> usize {
        self.pages.borrow().page_size
    }

    /// The last total count reported by the source, or 0 when unknown.
    pub fn count(&self) -> usize {
        self.pages.borrow().total_count.unwrap_or(0)
    }

    /// Whether the page owning `index` has been loaded.
    pub fn is_cached(&self, index: usize) -> bool {
        let pages = self.pages.borrow();
        let key = index - index % pages.page_size;
        matches!(pages.slots.get(&key), Some(Slot::Loaded(_)))
    }

    /// Keys of the pages with a fetch in flight, ascending.
    pub fn pending_pages(&self) -> Vec<usize> {
        let pages = self.pages.borrow();
        let mut keys: Vec<usize> = pages
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Pending(_)))
            .map(|(&key, _)| key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Resolves the item at `index`.
    ///
    /// Fails with [`Error::OutOfRange`] for a negative index or a position past the end of its
    /// page, and with [`Error::Fetch`] when the page could not be fetched.
    ///
    /// The page fetch is registered when this method is called, not when the future is first
    /// polled: two `at` calls for the same page issue a single fetch.
    pub fn at(&self, index: i64) -> impl Future<Output = Result<T, Error>> + use<T, S> {
        let request = usize::try_from(index).ok().map(|position| {
            let key = self.key_for(position);
            (position - key, key, self.request(key))
        });
        let pages = Rc::clone(&self.pages);
        async move {
            let Some((within, key, request)) = request else {
                return Err(Error::OutOfRange(index));
            };
            let page = settle(&pages, key, request).await?;
            page.items.get(within).cloned().ok_or(Error::OutOfRange(index))
        }
    }

    /// Resolves the whole page owning `index`, tagged with the page's first index.
    ///
    /// Unlike [`PageCache::slice`], a failed fetch is reported instead of dropped.
    pub fn page(&self, index: i64) -> impl Future<Output = Result<Window<T>, Error>> + use<T, S> {
        let request = usize::try_from(index).ok().map(|position| {
            let key = self.key_for(position);
            (key, self.request(key))
        });
        let pages = Rc::clone(&self.pages);
        async move {
            let Some((key, request)) = request else {
                return Err(Error::OutOfRange(index));
            };
            let page = settle(&pages, key, request).await?;
            Ok(Window {
                items: page.items.clone(),
                offset: key as i64,
            })
        }
    }

    /// Resolves up to `count` contiguous items starting at `index`.
    ///
    /// Never fails: a negative `index` or a non-positive `count` yields an empty window, pages
    /// whose fetch failed are left out, and a range running past the end of the collection
    /// comes back short. The returned window's `offset` is always `index`.
    ///
    /// Pages inside the known collection (a bounded number of them) are registered when this
    /// method is called. Past that, pages are fetched one at a time and the walk stops
    /// at the first short or failed page.
    pub fn slice(&self, index: i64, count: i64) -> impl Future<Output = Window<T>> + use<T, S> {
        let range = match (usize::try_from(index), usize::try_from(count)) {
            (Ok(start), Ok(count)) if count > 0 => {
                let end = start.saturating_add(count).min(index_limit());
                (start < end).then_some((start, end))
            }
            _ => None,
        };
        let page_size = self.page_size();
        let requests: Vec<(usize, Request<T>)> = match range {
            Some((start, end)) => {
                let first_key = self.key_for(start);
                let eager_end = self
                    .known_count()
                    .map_or(end, |total| end.min(total))
                    .min(first_key.saturating_add(page_size.saturating_mul(MAX_EAGER_PAGES)))
                    .max(first_key + 1);
                (first_key..eager_end)
                    .step_by(page_size)
                    .map(|key| (key, self.request(key)))
                    .collect()
            }
            None => Vec::new(),
        };
        let cache = self.clone();
        async move {
            let Some((start, end)) = range else {
                return Window::empty(index);
            };
            let (Some(&(first_key, _)), Some(&(last_key, _))) = (requests.first(), requests.last())
            else {
                return Window::empty(index);
            };

            let results = join_all(
                requests
                    .into_iter()
                    .map(|(key, request)| settle(&cache.pages, key, request)),
            )
            .await;

            // Surviving pages in key order; failed ones are skipped.
            let mut items = Vec::new();
            let mut total_count = None;
            let mut dropped = 0usize;
            let mut more = false;
            for result in results {
                match result {
                    Ok(page) => {
                        more = page.items.len() >= page_size;
                        total_count = Some(page.total_count);
                        items.extend(page.items.iter().cloned());
                    }
                    Err(_) => {
                        more = false;
                        dropped += 1;
                    }
                }
            }

            let wanted = end - first_key;
            let mut key = last_key + page_size;
            while more && key < end && items.len() < wanted {
                let request = cache.request(key);
                match settle(&cache.pages, key, request).await {
                    Ok(page) => {
                        more = page.items.len() >= page_size;
                        total_count = Some(page.total_count);
                        items.extend(page.items.iter().cloned());
                    }
                    Err(_) => {
                        dropped += 1;
                        break;
                    }
                }
                key += page_size;
            }

            if dropped > 0 {
                lwarn!(index, count, dropped, "slice: dropped pages that failed to load");
            }
            if let Some(total_count) = total_count {
                cache.pages.borrow_mut().total_count = Some(total_count);
            }

            Window {
                items: items
                    .into_iter()
                    .skip(start - first_key)
                    .take(end - start)
                    .collect(),
                offset: index,
            }
        }
    }

    fn known_count(&self) -> Option<usize> {
        self.pages.borrow().total_count
    }

    fn key_for(&self, index: usize) -> usize {
        let page_size = self.page_size();
        index - index % page_size
    }

    /// Returns the cached page, the in-flight fetch, or a newly registered fetch for `key`.
    fn request(&self, key: usize) -> Request<T> {
        let mut pages = self.pages.borrow_mut();
        match pages.slots.get(&key) {
            Some(Slot::Loaded(page)) => {
                ltrace!(key, "page cache hit");
                return Request::Ready(Rc::clone(page));
            }
            Some(Slot::Pending(fetch)) => {
                ltrace!(key, "joining in-flight page fetch");
                return Request::Pending(fetch.clone());
            }
            None => {}
        }

        let page_size = pages.page_size;
        ltrace!(key, page_size, "fetching page");
        let source = Rc::clone(&self.source);
        let fetch = async move {
            source
                .fetch(
                    i64::try_from(key).unwrap_or(i64::MAX),
                    i64::try_from(page_size).unwrap_or(i64::MAX),
                )
                .await
                .map(Rc::new)
        }
        .boxed_local()
        .shared();
        pages.slots.insert(key, Slot::Pending(fetch.clone()));
        Request::Pending(fetch)
    }
}

/// One past the largest index a [`DataSource`] can be asked for.
fn index_limit() -> usize {
    usize::try_from(i64::MAX).unwrap_or(usize::MAX)
}

/// Awaits `request` and records its outcome in the page map.
///
/// Every waiter runs this; only the one that still finds its own fetch in the slot moves the
/// slot on, so a slot replaced in the meantime is left alone.
async fn settle<T>(
    pages: &RefCell<Pages<T>>,
    key: usize,
    request: Request<T>,
) -> Result<Rc<FetchResult<T>>, Error> {
    let fetch = match request {
        Request::Ready(page) => return Ok(page),
        Request::Pending(fetch) => fetch,
    };
    let outcome = fetch.clone().await;

    let mut pages = pages.borrow_mut();
    let owns_slot =
        matches!(pages.slots.get(&key), Some(Slot::Pending(current)) if current.ptr_eq(&fetch));
    match outcome {
        Ok(page) => {
            if owns_slot {
                pages.slots.insert(key, Slot::Loaded(Rc::clone(&page)));
            }
            pages.total_count = Some(page.total_count);
            Ok(page)
        }
        Err(source) => {
            if owns_slot {
                lwarn!(key, error = %source, "page fetch failed");
                pages.slots.remove(&key);
            }
            Err(Error::Fetch {
                offset: key,
                source,
            })
        }
    }
}
