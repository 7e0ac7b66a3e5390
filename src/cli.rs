// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::{
    Report,
    eyre::{Result, bail},
};
use serde_json::json;

use crate::{
    config::options::{FailurePolicy, Method, SyncOptions},
    core::Fetcher,
    engine::{FileFormat, Partitioning, SyncReport, Syncer, UnitOutcome},
    progress::Progress,
    specs::Registry,
    store::{ObjectStoreWriter, StorageWriter},
};

#[derive(Debug, Parser)]
#[command(name = "nfl-sync", version, about = "Sync nflverse releases into object storage")]
pub struct Args {
    /// `init` runs the full backfill; anything else refreshes the current season
    #[arg(long, default_value = "update")]
    pub method: String,

    /// Target S3 bucket [env: NFL_DATA_BUCKET]
    #[arg(long, conflicts_with = "out_dir")]
    pub bucket: Option<String>,

    /// Write into a local directory instead of S3
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Schema used by --print-ddl [env: RAW_SCHEMA]
    #[arg(long)]
    pub schema: Option<String>,

    /// Only sync these dataset keys (repeatable)
    #[arg(long = "dataset", value_name = "KEY")]
    pub datasets: Vec<String>,

    /// Treat this as the current season instead of the clock's year
    #[arg(long)]
    pub year: Option<i32>,

    /// Remote format override: csv, csv.gz or parquet
    #[arg(long, value_parser = parse_format)]
    pub format: Option<FileFormat>,

    /// Datasets synced in parallel (each dataset stays sequential)
    #[arg(long)]
    pub workers: Option<usize>,

    #[arg(long)]
    pub max_redirects: Option<u32>,

    /// Stop at the first failed unit instead of reporting it and moving on
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the dataset registry and exit
    #[arg(long)]
    pub list: bool,

    /// Print staging-table DDL for every dataset and exit
    #[arg(long)]
    pub print_ddl: bool,
}

fn parse_format(s: &str) -> Result<FileFormat, String> {
    FileFormat::parse(s).ok_or_else(|| format!("Unknown format: {s}"))
}

impl Args {
    /// Environment first, flags on top.
    pub fn to_options(&self, base: SyncOptions) -> SyncOptions {
        let mut opts = base;
        if let Some(b) = &self.bucket {
            opts.bucket = Some(b.clone());
        }
        if let Some(s) = &self.schema {
            opts.schema = s.clone();
        }
        if let Some(y) = self.year {
            opts.current_year = y;
        }
        if let Some(w) = self.workers {
            opts.workers = w;
        }
        if let Some(r) = self.max_redirects {
            opts.max_redirects = r;
        }
        if self.fail_fast {
            opts.failure_policy = FailurePolicy::FailFast;
        }
        opts.format = self.format;
        opts.datasets = self.datasets.clone();
        opts
    }
}

pub fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    crate::log::init("info");

    let args = Args::parse();
    let opts = args.to_options(SyncOptions::from_env());
    let registry = Registry::global();

    if args.list {
        print_registry(registry);
        return Ok(());
    }
    if args.print_ddl {
        for d in registry.iter() {
            println!("{}\n", d.create_statement(&opts.schema));
        }
        return Ok(());
    }

    let writer: Box<dyn StorageWriter> = match (&args.out_dir, &opts.bucket) {
        (Some(dir), _) => Box::new(ObjectStoreWriter::local(dir)?),
        (None, Some(bucket)) => Box::new(ObjectStoreWriter::s3(bucket)?),
        (None, None) => bail!("No target: pass --bucket, --out-dir or set NFL_DATA_BUCKET"),
    };
    let fetcher = Fetcher::new(opts.max_redirects)?;

    let method = Method::from_selector(&args.method);
    let syncer = Syncer::new(registry, &fetcher, writer.as_ref(), opts);
    let mut progress = CliProgress::default();

    let report = match syncer.run(method, Some(&mut progress)) {
        Ok(report) => report,
        Err(crate::SyncError::Aborted { report, dataset, partition, source }) => {
            print_envelope(&report);
            return Err(Report::new(*source).wrap_err(format!("sync aborted at {dataset} {partition}")));
        }
        Err(e) => return Err(e.into()),
    };

    print_envelope(&report);
    if !report.is_success() {
        bail!("{} of {} units failed", report.failed(), report.units.len());
    }
    Ok(())
}

fn print_registry(registry: &Registry) {
    println!("{:<16} {:<34} {:<9} format", "key", "table", "from");
    for d in registry.iter() {
        let from = match d.partitioning {
            Partitioning::Yearly { min_year } => min_year.to_string(),
            Partitioning::Singleton => "-".into(),
        };
        println!("{:<16} {:<34} {:<9} {}", d.key, d.storage_table, from, d.kind.default_format());
    }
}

fn print_envelope(report: &SyncReport) {
    let (status, message) = if report.is_success() {
        (200, "NFL storage sync executed successfully")
    } else {
        (500, "NFL storage sync finished with failures")
    };
    let envelope = json!({
        "statusCode": status,
        "body": { "message": message, "summary": report },
    });
    match serde_json::to_string_pretty(&envelope) {
        Ok(s) => println!("{s}"),
        Err(e) => loge!("could not render summary: {e}"),
    }
}

/// Prints one stderr line per finished unit.
#[derive(Default)]
struct CliProgress {
    done: usize,
    total: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn unit_done(&mut self, unit: &UnitOutcome) {
        self.done += 1;
        eprintln!("[{}/{}] stored {}", self.done, self.total, unit.key);
    }
    fn unit_failed(&mut self, unit: &UnitOutcome) {
        self.done += 1;
        eprintln!("[{}/{}] FAILED {} {}", self.done, self.total, unit.dataset, unit.partition);
    }
    fn finish(&mut self) {
        eprintln!("Sync complete ({}/{})", self.done, self.total);
    }
}
