/// Pixel geometry of a fixed-row-height table.
///
/// Heights are in whatever unit the adapter uses (pixels, terminal rows). An `item_height` of
/// zero means "not measured yet".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub viewport_height: u32,
    pub item_height: u32,
}

impl Geometry {
    pub fn new(viewport_height: u32, item_height: u32) -> Self {
        Self {
            viewport_height,
            item_height,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.item_height > 0
    }

    /// Items fetched per batch: two viewports worth, never less than one.
    ///
    /// Returns 0 when the item height is unknown.
    pub fn batch_size(&self) -> usize {
        if !self.is_measured() {
            return 0;
        }
        let per_view = (self.viewport_height / self.item_height) as usize;
        per_view.saturating_mul(2).max(1)
    }

    /// Index of the item at the top of the viewport.
    pub fn first_index(&self, scroll_top: u64) -> usize {
        if !self.is_measured() {
            return 0;
        }
        usize::try_from(scroll_top / self.item_height as u64).unwrap_or(usize::MAX)
    }

    /// Index of the batch containing the first visible item.
    pub fn batch_index(&self, scroll_top: u64) -> Option<usize> {
        let batch_size = self.batch_size();
        if batch_size == 0 {
            return None;
        }
        Some(self.first_index(scroll_top) / batch_size)
    }

    /// Sub-item scroll offset the view applies to its item container.
    pub fn pixel_offset(&self, scroll_top: u64) -> u32 {
        if !self.is_measured() {
            return 0;
        }
        (scroll_top % self.item_height as u64) as u32
    }

    /// Height of the scrollable content for `total_count` items.
    pub fn content_height(&self, total_count: usize) -> u64 {
        (total_count as u64).saturating_mul(self.item_height as u64)
    }
}
