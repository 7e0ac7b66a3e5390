// src/lib.rs
//! Sync published NFL statistics releases into a partitioned object store.
//!
//! ```text
//! cli → engine::Syncer ─ specs::Registry::lookup → DatasetKind::fetch_unit
//!                      ├ core::net::Fetcher (redirects) → core::gzip
//!                      └ store::StorageWriter::put("{table}/{year}.csv")
//! ```

#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod progress;
pub mod specs;
pub mod store;

pub use error::SyncError;

#[doc(hidden)]
pub use tracing as __tracing;
