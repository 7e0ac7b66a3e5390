// src/engine/report.rs
use serde::Serialize;

use crate::engine::types::Partition;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum UnitStatus {
    Stored { bytes: usize },
    Failed { error: String },
}

/// Outcome of one (dataset, partition) unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitOutcome {
    pub dataset: String,
    pub partition: Partition,
    pub key: String,
    #[serde(flatten)]
    pub status: UnitStatus,
}

impl UnitOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, UnitStatus::Stored { .. })
    }
}

/// Summary of a run: which units were stored and which failed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SyncReport {
    pub target: String,
    pub current_year: i32,
    /// Ordered per dataset; datasets appear in completion order.
    pub units: Vec<UnitOutcome>,
    /// Units planned but never attempted because the run stopped early.
    pub skipped: usize,
    /// Datasets that fetched their default format because the requested
    /// override is not offered for them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored_format_override: Vec<String>,
}

impl SyncReport {
    pub fn succeeded(&self) -> usize {
        self.units.iter().filter(|u| u.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.units.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.units.iter().filter(|u| !u.is_ok())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }
}
