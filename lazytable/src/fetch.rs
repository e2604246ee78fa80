use std::future::Future;

use futures::future::join_all;

use crate::{Data, DataSource, Error, PageCache, PageEntry};

/// Fetches `page_count` consecutive pages starting at page index `first_page` through `cache`
/// and packages them as a reducer payload.
///
/// The payload's `page_size` is the cache page size and its `total_count` the last count the
/// cache observed. Pages whose fetch failed are left out; when every page failed, the first
/// error is returned. Fetches are registered when this function is called.
pub fn fetch_pages<T, S>(
    cache: &PageCache<T, S>,
    first_page: usize,
    page_count: usize,
) -> impl Future<Output = Result<Data<T>, Error>> + use<T, S>
where
    T: Clone + 'static,
    S: DataSource<T> + 'static,
{
    let page_size = cache.page_size();
    let requests: Vec<_> = (first_page..first_page.saturating_add(page_count))
        .map(|page| {
            let offset = page.saturating_mul(page_size);
            (page, cache.page(i64::try_from(offset).unwrap_or(i64::MAX)))
        })
        .collect();
    let cache = cache.clone();
    async move {
        let results = join_all(
            requests
                .into_iter()
                .map(|(page, fetch)| async move { (page, fetch.await) }),
        )
        .await;

        let mut data = Data::new(page_size, 0);
        let mut first_error = None;
        for (page, result) in results {
            match result {
                Ok(window) => {
                    data.pages.insert(page, PageEntry::Loaded(window.items));
                }
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        match first_error {
            Some(err) if data.pages.is_empty() => return Err(err),
            _ => {}
        }
        data.total_count = cache.count();
        Ok(data)
    }
}
