// src/config/options.rs
use chrono::Datelike;

use super::consts::*;
use crate::engine::types::FileFormat;

/// What to do when one unit fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failed unit and return it as the run's error.
    FailFast,
    /// Log the failure, keep going, report it in the summary.
    #[default]
    Continue,
}

/// Which entrypoint to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Full historical backfill.
    Init,
    /// Current season plus the singleton files.
    Update,
}

impl Method {
    /// `"init"` (or the older `"init_s3"`) selects the backfill; anything else
    /// is a refresh.
    pub fn from_selector(s: &str) -> Self {
        match s {
            "init" | "init_s3" => Method::Init,
            _ => Method::Update,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    pub bucket: Option<String>,
    pub schema: String,
    /// Read once at startup; every unit of the run sees the same value.
    pub current_year: i32,
    pub max_redirects: u32,
    pub workers: usize,
    pub failure_policy: FailurePolicy,
    /// Applied to every dataset that accepts it; `None` uses each dataset's default.
    pub format: Option<FileFormat>,
    /// Restrict the run to these registry keys. Empty means all of them.
    pub datasets: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            bucket: None,
            schema: s(DEFAULT_SCHEMA),
            current_year: this_year(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            workers: DEFAULT_WORKERS,
            failure_policy: FailurePolicy::default(),
            format: None,
            datasets: Vec::new(),
        }
    }
}

impl SyncOptions {
    /// Defaults overlaid with `NFL_DATA_BUCKET` and `RAW_SCHEMA`.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        opts.bucket = get(ENV_BUCKET).filter(|b| !b.trim().is_empty());
        if let Some(schema) = get(ENV_SCHEMA).filter(|v| !v.trim().is_empty()) {
            opts.schema = schema;
        }
        opts
    }

    /// Worker count clamped to `1..=MAX_WORKERS`.
    pub fn effective_workers(&self) -> usize {
        self.workers.clamp(1, MAX_WORKERS)
    }
}

pub fn this_year() -> i32 {
    chrono::Utc::now().year()
}

fn s(v: &str) -> String {
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_defaults() {
        let env: HashMap<&str, &str> =
            [("NFL_DATA_BUCKET", "nfl-staging-datalake"), ("RAW_SCHEMA", "staging")].into();
        let opts = SyncOptions::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(opts.bucket.as_deref(), Some("nfl-staging-datalake"));
        assert_eq!(opts.schema, "staging");
    }

    #[test]
    fn missing_env_keeps_defaults() {
        let opts = SyncOptions::from_lookup(|_| None);
        assert_eq!(opts.bucket, None);
        assert_eq!(opts.schema, "raw");
        assert_eq!(opts.max_redirects, 5);
        assert_eq!(opts.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn selector_mapping() {
        assert_eq!(Method::from_selector("init"), Method::Init);
        assert_eq!(Method::from_selector("init_s3"), Method::Init);
        assert_eq!(Method::from_selector("update"), Method::Update);
        assert_eq!(Method::from_selector(""), Method::Update);
    }

    #[test]
    fn workers_are_clamped() {
        let mut o = SyncOptions::default();
        o.workers = 0;
        assert_eq!(o.effective_workers(), 1);
        o.workers = 64;
        assert_eq!(o.effective_workers(), MAX_WORKERS);
    }
}
