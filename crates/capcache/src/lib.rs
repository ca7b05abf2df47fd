//! # capcache
//!
//! Advisory on-disk cache of remote storage capacity.
//!
//! Querying a cloud remote for its capacity can take seconds, so interactive
//! front-ends read capacity numbers from a small local file instead and let a
//! background job rewrite that file whenever it gets around to it.
//!
//! This crate provides:
//! - **Units**: normalize human-readable sizes (`"1.2 TiB"`) into byte counts
//! - **Store**: load and atomically replace the cache file
//! - **Sort**: rank remotes by name or by a capacity field
//! - **Refresh**: query a [`CapacitySource`] for every remote and rewrite the cache
//!
//! ## Example
//!
//! ```no_run
//! use capcache::{CapacityStore, SortMode, sort_remotes};
//!
//! let store = CapacityStore::load("/tmp/remotes.cache").expect("read cache");
//! let remotes = vec!["gdrive".to_string(), "b2".to_string()];
//! let ranked = sort_remotes(&remotes, SortMode::Free, &store);
//! println!("{ranked:?}");
//! ```
//!
//! ## File format
//!
//! ```text
//! # rcmenu capacity cache
//! # name|total|used|free
//! gdrive|15 GiB|2.345 GiB|12.6 GiB
//! ```
//!
//! The cache is advisory: a missing, stale or partially malformed file never
//! causes an error, only missing numbers.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for cache operations.
pub mod error;
/// Capacity records and the in-memory store.
pub mod record;
/// Capacity refresh against an external source.
pub mod refresh;
/// Remote ordering by name or capacity.
pub mod sort;
/// Persistence of the cache file.
pub mod store;
/// Human-readable size normalization.
pub mod units;

pub use error::{Error, Result};
pub use record::{CapacityField, CapacityRecord, CapacityStore};
pub use refresh::{
    CapacitySource, MockSource, RefreshReport, parse_about, refresh, refresh_with_progress,
};
pub use sort::{SortMode, sort_remotes};
pub use units::normalize;
