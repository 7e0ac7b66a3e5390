// src/engine/mod.rs
pub mod report;
pub mod sync;
pub mod types;

pub use report::{SyncReport, UnitOutcome, UnitStatus};
pub use sync::Syncer;
pub use types::{FetchUnit, FileFormat, Partition, Partitioning, storage_key};
