/// Configuration for [`crate::Controller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerOptions {
    /// Height of the visible area, in the same unit as the item height.
    pub viewport_height: u32,
    /// Batches prefetched on each side of the batch under the scroll position.
    ///
    /// The default of 1 keeps the previous, current and next batch loaded.
    pub lookahead: usize,
}

impl ControllerOptions {
    pub fn new(viewport_height: u32) -> Self {
        Self {
            viewport_height,
            lookahead: 1,
        }
    }

    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::new(0)
    }
}
