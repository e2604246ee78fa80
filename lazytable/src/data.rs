use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::PageStatus;

/// A cached page as tracked by the reducer.
///
/// "Absent" is the lack of an entry, "Unavailable" is derived by [`page_status`]; neither is
/// stored.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageEntry<T> {
    Loading,
    Loaded(Vec<T>),
}

impl<T> PageEntry<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Paged collection data held by the reducer.
///
/// `pages` is keyed by page index (not item offset): page `p` covers items
/// `p * page_size .. (p + 1) * page_size`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Data<T> {
    pub page_size: usize,
    pub total_count: usize,
    pub pages: BTreeMap<usize, PageEntry<T>>,
}

impl<T> Data<T> {
    pub fn new(page_size: usize, total_count: usize) -> Self {
        Self {
            page_size,
            total_count,
            pages: BTreeMap::new(),
        }
    }

    /// Builder-style insert of one page entry.
    pub fn with_page(mut self, page_index: usize, entry: PageEntry<T>) -> Self {
        self.pages.insert(page_index, entry);
        self
    }

    /// Whether `other` was computed for the same page size and collection size.
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.page_size == other.page_size && self.total_count == other.total_count
    }

    /// Number of pages needed to cover `total_count` items.
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }
}

impl<T> Default for Data<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Derives the load state of `page_index` from `data`.
///
/// This holds no hidden state: the same `(data, page_index)` always yields the same answer.
pub fn page_status<T>(data: &Data<T>, page_index: i64) -> PageStatus {
    let Ok(page_index) = usize::try_from(page_index) else {
        return PageStatus::Unavailable;
    };
    if data.total_count == 0 || data.page_size == 0 {
        return PageStatus::Unavailable;
    }
    match page_index.checked_mul(data.page_size) {
        Some(first) if first < data.total_count => {}
        _ => return PageStatus::Unavailable,
    }
    match data.pages.get(&page_index) {
        None => PageStatus::Absent,
        Some(PageEntry::Loading) => PageStatus::Loading,
        Some(PageEntry::Loaded(_)) => PageStatus::Loaded,
    }
}
