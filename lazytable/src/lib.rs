//! A lazy, paginated windowing cache for huge collections.
//!
//! For adapter-level drivers (the load loop, a single sliding pager), see the
//! `lazytable-adapter` crate.
//!
//! Items live behind a [`DataSource`] that is only able to fetch fixed-size batches
//! asynchronously. This crate keeps the bookkeeping needed to show a small window of such a
//! collection:
//! - [`PageCache`]: fetches pages on demand, at most one in-flight fetch per page
//! - [`slide_items`] / [`window_items`]: display windows with `None` for unknown positions
//! - [`page_status`]: the per-page load state derived from cached data
//! - [`State`] + [`Action`]: the reducer that owns scroll/selection/load state, and [`plan`],
//!   which decides what the driver should do next
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport height and item height ([`Geometry`])
//! - scroll offset
//! - rendering of the `Option<T>` window it is handed
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

#[cfg(feature = "std")]
mod cache;
mod data;
mod error;
#[cfg(feature = "std")]
mod fetch;
mod geometry;
mod plan;
mod projection;
mod source;
mod state;
mod types;


#[cfg(feature = "std")]
pub use cache::PageCache;
pub use data::{Data, PageEntry, page_status};
pub use error::{Error, FetchError};
#[cfg(feature = "std")]
pub use fetch::fetch_pages;
pub use geometry::Geometry;
pub use plan::{Plan, plan};
pub use projection::{slide_items, window_items};
pub use source::DataSource;
pub use state::{Action, State};
pub use types::{FetchResult, PageStatus, Selection, Status, Window};
