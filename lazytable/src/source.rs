use core::future::Future;

use crate::{FetchError, FetchResult};

/// The external capability the cache fetches pages from.
///
/// Contract:
/// - items start at exactly `index` (or the fetch fails)
/// - fewer than `count` items may be returned near the end of the collection
/// - `total_count` reflects the source's current belief about the collection size
/// - a negative `index`, an `index` past the last item, or a negative `count` fails with
///   [`FetchError::OutOfRange`]
///
/// The cache treats every failure as "page temporarily unavailable".
///
/// Plain closures returning a future implement this trait.
pub trait DataSource<T> {
    fn fetch(
        &self,
        index: i64,
        count: i64,
    ) -> impl Future<Output = Result<FetchResult<T>, FetchError>>;
}

impl<T, F, Fut> DataSource<T> for F
where
    F: Fn(i64, i64) -> Fut,
    Fut: Future<Output = Result<FetchResult<T>, FetchError>>,
{
    fn fetch(
        &self,
        index: i64,
        count: i64,
    ) -> impl Future<Output = Result<FetchResult<T>, FetchError>> {
        self(index, count)
    }
}
