use alloc::vec::Vec;

/// One batch of items produced by a [`crate::DataSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchResult<T> {
    /// Index of the first item in `items`.
    pub from: usize,
    /// At most the requested number of items; fewer near the end of the collection.
    pub items: Vec<T>,
    /// The source's current belief about the collection size.
    pub total_count: usize,
}

/// A contiguous run of items tagged with the offset it was requested at.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window<T> {
    pub items: Vec<T>,
    pub offset: i64,
}

impl<T> Window<T> {
    pub fn empty(offset: i64) -> Self {
        Self {
            items: Vec::new(),
            offset,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Window<T> {
    fn default() -> Self {
        Self::empty(0)
    }
}

/// Load state of one page, derived by [`crate::page_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageStatus {
    /// In range, never requested.
    Absent,
    /// Requested, not resolved yet.
    Loading,
    Loaded,
    /// Outside the collection (or the collection geometry is unknown).
    Unavailable,
}

/// Top-level status of a [`crate::State`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[default]
    None,
    Loading,
    Loaded,
    /// Treated like `None`: the driver re-enters `Loading`.
    Unavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    Click,
    Hover,
}
