// src/error.rs
use crate::core::{FetchError, GzipError};
use crate::engine::report::SyncReport;
use crate::engine::types::Partition;
use crate::specs::UnknownDatasetKind;
use crate::specs::datasets::UnitPlanError;
use crate::store::StorageError;

/// Everything that can go wrong while syncing one unit, or a whole run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    UnknownDatasetKind(#[from] UnknownDatasetKind),

    #[error(transparent)]
    Plan(#[from] UnitPlanError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Gzip(#[from] GzipError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A unit failed under the fail-fast policy; the run stopped there.
    /// `report` holds what was done before the failure.
    #[error("{dataset} {partition}: {source}")]
    Aborted {
        dataset: String,
        partition: Partition,
        #[source]
        source: Box<SyncError>,
        report: Box<SyncReport>,
    },
}
