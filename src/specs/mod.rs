// src/specs/mod.rs
//! # Dataset “specs” module
//!
//! This module hosts the **dataset registry**: which published datasets exist,
//! where each one lives upstream, and where its partitions land in storage.
//!
//! ## What lives here
//! - **Descriptors** (`registry::DatasetDescriptor`): storage table, natural key
//!   columns, partitioning (yearly with a floor, or a single canonical file) and
//!   the “current period” key.
//! - **Fetch routines** (`datasets::DatasetKind`): one variant per dataset, with
//!   the remote path layout, the default format and the formats it accepts.
//!   Bespoke behaviour (gzip-only next-gen stats, the three PFR splits) stays here
//!   as small per-variant arms.
//!
//! ## What does **not** live here
//! - **Network I/O** – `core::net` fetches; specs only say *what* to fetch.
//! - **Iteration & writes** – `engine::sync` walks partitions and stores bytes.
//!
//! ## Conventions & invariants
//! - Keys are unique; every descriptor is reached through `Registry::lookup`.
//! - Registration order is the order of a full run.
//! - Storage keys are always `{table}/{year}.csv` or `{table}/{table}.csv`.
pub mod datasets;
pub mod registry;

pub use datasets::DatasetKind;
pub use registry::{DatasetDescriptor, Registry, UnknownDatasetKind};
