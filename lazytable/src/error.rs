use alloc::string::String;

use thiserror::Error;

/// Errors a [`crate::DataSource`] fails a fetch with.
///
/// The cache shares one pending fetch between every caller waiting on the same page, so this
/// type is `Clone`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("fetch of {count} items at {index} is out of range")]
    OutOfRange { index: i64, count: i64 },
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`crate::PageCache`] lookups.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("index {0} is out of range")]
    OutOfRange(i64),
    #[error("page at offset {offset} failed to load")]
    Fetch {
        offset: usize,
        #[source]
        source: FetchError,
    },
}
