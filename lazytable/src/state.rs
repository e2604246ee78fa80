use alloc::vec::Vec;

use crate::{Data, PageEntry, Selection, Status};

/// Events accepted by [`State::reduce`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action<T> {
    /// The view scrolled. Does not fetch by itself.
    Scroll { scroll_top: u64 },
    /// Click selection or pointer hover; neither affects fetching.
    Select { selection: Selection, index: usize },
    /// Pages about to be fetched. Only applied while `Loaded`.
    Load { pages: Vec<usize> },
    /// A fetched payload.
    Loaded { data: Data<T> },
    /// The data source changed: drop everything.
    Reset,
    Initialize,
    /// The item measurement is ready.
    Initialized,
}

/// A snapshot of the table state.
///
/// Snapshots only change through [`State::reduce`], which consumes one state and returns the
/// next.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State<T> {
    status: Status,
    scroll_top: u64,
    data: Option<Data<T>>,
    selected: Option<usize>,
    hovered: Option<usize>,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> State<T> {
    /// The initial state: status `None`, no data, nothing selected.
    pub fn new() -> Self {
        Self {
            status: Status::None,
            scroll_top: 0,
            data: None,
            selected: None,
            hovered: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    pub fn data(&self) -> Option<&Data<T>> {
        self.data.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Total item count of the cached data, 0 without data.
    pub fn total_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.total_count)
    }

    /// Applies `action` and returns the next snapshot.
    pub fn reduce(self, action: Action<T>) -> Self {
        match action {
            Action::Reset => Self::new(),
            Action::Initialize => Self {
                status: Status::Loading,
                scroll_top: self.scroll_top,
                data: self.data,
                selected: self.selected,
                hovered: self.hovered,
            },
            Action::Initialized => {
                if self.status != Status::Loading {
                    return self;
                }
                Self {
                    status: Status::Loaded,
                    scroll_top: self.scroll_top,
                    data: self.data,
                    selected: self.selected,
                    hovered: self.hovered,
                }
            }
            Action::Scroll { scroll_top } => Self {
                status: self.status,
                scroll_top,
                data: self.data,
                selected: self.selected,
                hovered: self.hovered,
            },
            Action::Load { pages } => {
                if self.status != Status::Loaded {
                    return self;
                }
                let mut data = self.data.unwrap_or_default();
                for page in pages {
                    data.pages.insert(page, PageEntry::Loading);
                }
                Self {
                    status: Status::Loaded,
                    scroll_top: self.scroll_top,
                    data: Some(data),
                    selected: self.selected,
                    hovered: self.hovered,
                }
            }
            Action::Loaded { data: incoming } => match self.data {
                Some(mut data) if data.same_geometry(&incoming) => {
                    data.pages.extend(incoming.pages);
                    Self {
                        status: Status::Loaded,
                        scroll_top: self.scroll_top,
                        data: Some(data),
                        selected: self.selected,
                        hovered: self.hovered,
                    }
                }
                _ => {
                    ldebug!(
                        page_size = incoming.page_size,
                        total_count = incoming.total_count,
                        "geometry changed, dropping cached pages"
                    );
                    Self {
                        status: Status::Loaded,
                        data: Some(incoming),
                        ..Self::new()
                    }
                }
            },
            Action::Select {
                selection: Selection::Click,
                index,
            } => Self {
                status: self.status,
                scroll_top: self.scroll_top,
                data: self.data,
                selected: Some(index),
                hovered: self.hovered,
            },
            Action::Select {
                selection: Selection::Hover,
                index,
            } => Self {
                status: self.status,
                scroll_top: self.scroll_top,
                data: self.data,
                selected: self.selected,
                hovered: Some(index),
            },
        }
    }
}
