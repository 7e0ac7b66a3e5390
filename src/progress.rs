// src/progress.rs
use crate::engine::report::UnitOutcome;

/// Lightweight progress reporting used by long-running syncs.
/// Frontends implement this to surface status to users.
/// Callbacks always arrive on the thread that started the run.
pub trait Progress {
    /// Called at the start with the number of planned units.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one unit was stored.
    fn unit_done(&mut self, _unit: &UnitOutcome) {}

    /// Called when one unit failed.
    fn unit_failed(&mut self, _unit: &UnitOutcome) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
