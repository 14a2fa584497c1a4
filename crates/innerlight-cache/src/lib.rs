//! Query cache & mutation coordinator for the Inner Light client.
//!
//! Sits between the views and the remote entity store: owns per-collection
//! cached snapshots, collapses concurrent fetches for the same key into a
//! single store call, and marks dependent snapshots stale the moment a
//! mutation succeeds so no view renders pre-mutation data as fresh.
//!
//! [`Library`] layers the devotional business rules (favorite idempotence,
//! one-highlight-per-verse, bookmark toggling, journal validation) on top
//! of the raw [`QueryCache`].

pub mod error;

mod cache;
mod key;
mod library;
mod snapshot;

pub use cache::QueryCache;
pub use error::{Error, Result};
pub use key::CollectionKey;
pub use library::{BookmarkChange, HighlightChange, Library};
pub use snapshot::{Freshness, Snapshot};

#[cfg(test)]
mod tests;
