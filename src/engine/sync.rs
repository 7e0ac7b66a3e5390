// src/engine/sync.rs
use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc,
    },
    thread,
};

use crate::{
    config::options::{FailurePolicy, Method, SyncOptions},
    core::{RemoteSource, decompress_gzip},
    engine::{
        report::{SyncReport, UnitOutcome, UnitStatus},
        types::{FileFormat, Partition},
    },
    error::SyncError,
    progress::Progress,
    specs::{DatasetDescriptor, Registry},
    store::StorageWriter,
};

/// One dataset and the partitions to sync for it, in order.
struct Job<'r> {
    desc: &'r DatasetDescriptor,
    partitions: Vec<Partition>,
}

enum Event {
    Done(UnitOutcome),
    Failed(UnitOutcome, SyncError),
}

/// Walks registry entries, fetches each partition and stores it.
///
/// Datasets are handed to up to `workers` threads; each dataset is owned by
/// exactly one worker, which runs its partitions in ascending order. With the
/// default single worker the run is strictly sequential in registry order.
pub struct Syncer<'a> {
    registry: &'a Registry,
    source: &'a dyn RemoteSource,
    writer: &'a dyn StorageWriter,
    opts: SyncOptions,
    current_year: i32,
}

impl<'a> Syncer<'a> {
    pub fn new(
        registry: &'a Registry,
        source: &'a dyn RemoteSource,
        writer: &'a dyn StorageWriter,
        opts: SyncOptions,
    ) -> Self {
        let current_year = opts.current_year;
        Self { registry, source, writer, opts, current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn run(
        &self,
        method: Method,
        progress: Option<&mut dyn Progress>,
    ) -> Result<SyncReport, SyncError> {
        match method {
            Method::Init => self.initialize_all(progress),
            Method::Update => self.refresh_current(progress),
        }
    }

    /// Full backfill: every year of every yearly dataset, plus each singleton.
    pub fn initialize_all(&self, progress: Option<&mut dyn Progress>) -> Result<SyncReport, SyncError> {
        logf!("Initializing storage (seasons through {})", self.current_year);
        let year = self.current_year;
        let jobs = self.plan(|d| d.partitions(year))?;
        self.execute(jobs, progress)
    }

    /// Current season of every yearly dataset (overwritten, upstream revises
    /// in-season data) and every singleton file.
    pub fn refresh_current(&self, progress: Option<&mut dyn Progress>) -> Result<SyncReport, SyncError> {
        logf!("Updating storage for season {}", self.current_year);
        let year = self.current_year;
        let jobs = self.plan(|d| vec![d.current_partition(year)])?;
        self.execute(jobs, progress)
    }

    /// Fetch one partition and write it. Returns the stored key and size.
    pub fn sync_unit(
        &self,
        desc: &DatasetDescriptor,
        partition: Partition,
    ) -> Result<(String, usize), SyncError> {
        let unit = desc.kind.fetch_unit(partition, self.format_for(desc))?;
        let key = desc.key_for(partition);

        let raw = self.source.get(&unit.host, &unit.path)?;
        let body = match unit.format {
            FileFormat::GzippedCsv => decompress_gzip(&raw)?,
            FileFormat::Csv | FileFormat::Parquet => raw,
        };

        self.writer.put(&key, &body)?;
        Ok((key, body.len()))
    }

    /// The run-wide format override, where the dataset accepts it.
    fn format_for(&self, desc: &DatasetDescriptor) -> Option<FileFormat> {
        self.opts.format.filter(|f| desc.kind.supports(*f))
    }

    /// Datasets in this run that will not honour the format override.
    fn ignored_override(&self, jobs: &[Job<'_>]) -> Vec<String> {
        let Some(f) = self.opts.format else { return Vec::new() };
        jobs.iter()
            .filter(|j| !j.desc.kind.supports(f))
            .map(|j| {
                logf!(
                    "{}: format override {} not supported, fetching {} instead",
                    j.desc.key,
                    f,
                    j.desc.kind.default_format()
                );
                j.desc.key.to_string()
            })
            .collect()
    }

    fn plan(
        &self,
        partitions: impl Fn(&DatasetDescriptor) -> Vec<Partition>,
    ) -> Result<Vec<Job<'a>>, SyncError> {
        let keys: Vec<&str> = if self.opts.datasets.is_empty() {
            self.registry.keys()
        } else {
            self.opts.datasets.iter().map(String::as_str).collect()
        };

        let mut jobs = Vec::with_capacity(keys.len());
        for key in keys {
            let desc = self.registry.lookup(key)?;
            jobs.push(Job { desc, partitions: partitions(desc) });
        }
        Ok(jobs)
    }

    fn execute(
        &self,
        jobs: Vec<Job<'a>>,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<SyncReport, SyncError> {
        let total: usize = jobs.iter().map(|j| j.partitions.len()).sum();
        if let Some(p) = progress.as_deref_mut() {
            p.begin(total);
            p.log(&format!("Syncing {} units to {}", total, self.writer.describe()));
        }

        let mut report = SyncReport {
            target: self.writer.describe(),
            current_year: self.current_year,
            units: Vec::with_capacity(total),
            skipped: 0,
            ignored_format_override: self.ignored_override(&jobs),
        };
        let mut first_failure: Option<(String, Partition, SyncError)> = None;

        let next = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);
        let workers = self.opts.effective_workers().min(jobs.len()).max(1);
        let (tx, rx) = mpsc::channel::<Event>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let (jobs, next, stop) = (&jobs, &next, &stop);
                scope.spawn(move || {
                    loop {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(job) = jobs.get(i) else { break };
                        self.run_job(job, stop, &tx);
                    }
                });
            }
            drop(tx); // this thread is sole receiver now

            for event in rx {
                match event {
                    Event::Done(outcome) => {
                        if let Some(p) = progress.as_deref_mut() {
                            p.unit_done(&outcome);
                        }
                        report.units.push(outcome);
                    }
                    Event::Failed(outcome, err) => {
                        if let Some(p) = progress.as_deref_mut() {
                            p.unit_failed(&outcome);
                        }
                        if first_failure.is_none() {
                            first_failure = Some((outcome.dataset.clone(), outcome.partition, err));
                        }
                        report.units.push(outcome);
                    }
                }
            }
        });

        report.skipped = total - report.units.len();
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        logf!(
            "Sync finished: {} stored, {} failed, {} skipped",
            report.succeeded(),
            report.failed(),
            report.skipped
        );

        match (self.opts.failure_policy, first_failure) {
            (FailurePolicy::FailFast, Some((dataset, partition, err))) => Err(SyncError::Aborted {
                dataset,
                partition,
                source: Box::new(err),
                report: Box::new(report),
            }),
            _ => Ok(report),
        }
    }

    fn run_job(&self, job: &Job<'_>, stop: &AtomicBool, tx: &mpsc::Sender<Event>) {
        let desc = job.desc;
        let _span = tracing::info_span!("dataset", key = desc.key).entered();

        for &partition in &job.partitions {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            logf!("Extracting {} data for {}", desc.key, partition);

            let event = match self.sync_unit(desc, partition) {
                Ok((key, bytes)) => Event::Done(UnitOutcome {
                    dataset: desc.key.to_string(),
                    partition,
                    key,
                    status: UnitStatus::Stored { bytes },
                }),
                Err(err) => {
                    loge!("{} {}: {}", desc.key, partition, err);
                    if self.opts.failure_policy == FailurePolicy::FailFast {
                        stop.store(true, Ordering::Relaxed);
                    }
                    let key = desc.key_for(partition);
                    let outcome = UnitOutcome {
                        dataset: desc.key.to_string(),
                        partition,
                        key,
                        status: UnitStatus::Failed { error: err.to_string() },
                    };
                    Event::Failed(outcome, err)
                }
            };
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}
