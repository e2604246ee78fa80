//! Drivers for the `lazytable` crate.
//!
//! The `lazytable` crate is UI-agnostic and only holds state and pure decisions. This crate
//! runs those decisions against a real [`lazytable::DataSource`]:
//!
//! - [`Controller`]: owns the table reducer and a page cache, and executes the load loop
//!   (initialize, wait for measurement, fetch the batches around the scroll position)
//! - [`Pager`]: a single window over a collection that slides with an offset and reuses the
//!   previous batch while the next one loads
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings) and
//! single-threaded: fetch futures are `!Send` and are meant to be polled on the UI thread's
//! executor. Both drivers need the `std` feature (on by default); without it only
//! [`ControllerOptions`] is available.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

#[cfg(feature = "std")]
mod controller;
mod options;
#[cfg(feature = "std")]
mod pager;

#[cfg(all(test, feature = "std"))]
mod tests;

#[cfg(feature = "std")]
pub use controller::{CompletedLoad, Controller, PendingLoad};
pub use options::ControllerOptions;
#[cfg(feature = "std")]
pub use pager::Pager;
