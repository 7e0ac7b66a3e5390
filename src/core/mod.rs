// src/core/mod.rs

pub mod gzip;
pub mod net;

pub use gzip::{GzipError, decompress_gzip};
pub use net::{FetchError, Fetcher, RemoteSource, Scheme};
