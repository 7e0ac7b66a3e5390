// src/engine/types.rs
use std::fmt;

use serde::Serialize;

/// Payload format of a remote release asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Csv,
    GzippedCsv,
    Parquet,
}

impl FileFormat {
    /// File extension used in remote asset names.
    pub fn remote_ext(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::GzippedCsv => "csv.gz",
            FileFormat::Parquet => "parquet",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "csv.gz" | "gz" | "gzip" => Some(FileFormat::GzippedCsv),
            "parquet" => Some(FileFormat::Parquet),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.remote_ext())
    }
}

/// How a dataset's releases are split into stored objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partitioning {
    /// One object per season, from `min_year` through the current year.
    Yearly { min_year: i32 },
    /// One canonical object, mutated in place upstream.
    Singleton,
}

/// The partition value of one fetch unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Year(i32),
    Singleton,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Year(y) => write!(f, "{y}"),
            Partition::Singleton => f.write_str("singleton"),
        }
    }
}

/// One concrete remote retrieval. Built by the orchestrator, consumed once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchUnit {
    pub host: String,
    pub path: String,
    pub format: FileFormat,
}

/// `"{table}/{year}.csv"` for yearly partitions, `"{table}/{table}.csv"` otherwise.
///
/// Downstream loaders read this layout, so the key never depends on the
/// payload format that was fetched.
pub fn storage_key(table: &str, partition: Partition) -> String {
    match partition {
        Partition::Year(y) => format!("{table}/{y:04}.csv"),
        Partition::Singleton => format!("{table}/{table}.csv"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_table_partition_layout() {
        assert_eq!(
            storage_key("play_by_play", Partition::Year(2020)),
            "play_by_play/2020.csv"
        );
        assert_eq!(storage_key("players", Partition::Singleton), "players/players.csv");
        assert_eq!(storage_key("rushing_next_gen_stats", Partition::Year(2016)), "rushing_next_gen_stats/2016.csv");
    }

    #[test]
    fn format_parse_accepts_remote_extensions() {
        for f in [FileFormat::Csv, FileFormat::GzippedCsv, FileFormat::Parquet] {
            assert_eq!(FileFormat::parse(f.remote_ext()), Some(f));
        }
        assert_eq!(FileFormat::parse("xlsx"), None);
    }
}
