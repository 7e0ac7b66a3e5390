// src/specs/datasets.rs
//! Per-dataset fetch routines.
//!
//! Every published dataset is one [`DatasetKind`] variant. The remote layout,
//! default format and accepted format overrides are decided by an exhaustive
//! `match`, so adding a dataset without teaching it how to fetch itself does
//! not compile.

use std::fmt;

use serde::Serialize;

use crate::config::consts::{
    ODDS_HOST, ODDS_PATH, PLAYER_IDS_HOST, PLAYER_IDS_PATH, RELEASE_HOST, RELEASE_PREFIX,
};
use crate::engine::types::{FetchUnit, FileFormat, Partition};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    PlayByPlay,
    Players,
    Weekly,
    Combine,
    Injuries,
    NgsRushing,
    NgsPassing,
    NgsReceiving,
    DepthChart,
    PfrRushing,
    PfrPassing,
    PfrReceiving,
    Snaps,
    GameOdds,
    Ftn,
    WeeklyRosters,
    PlayerIds,
}

/// Pro Football Reference advanced stats are split three ways; the splits
/// only differ in the asset name suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PfrSplit {
    Rush,
    Pass,
    Rec,
}

impl PfrSplit {
    fn suffix(self) -> &'static str {
        match self {
            PfrSplit::Rush => "_rush_",
            PfrSplit::Pass => "_pass_",
            PfrSplit::Rec => "_rec_",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{dataset} cannot be fetched as {format}")]
pub struct UnsupportedFormat {
    pub dataset: DatasetKind,
    pub format: FileFormat,
}

#[derive(Debug, thiserror::Error)]
#[error("{dataset} is {expected} but was asked for {partition}")]
pub struct PartitionMismatch {
    pub dataset: DatasetKind,
    pub expected: &'static str,
    pub partition: Partition,
}

#[derive(Debug, thiserror::Error)]
pub enum UnitPlanError {
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),
    #[error(transparent)]
    PartitionMismatch(#[from] PartitionMismatch),
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 17] = [
        DatasetKind::PlayByPlay,
        DatasetKind::Players,
        DatasetKind::Weekly,
        DatasetKind::Combine,
        DatasetKind::Injuries,
        DatasetKind::NgsRushing,
        DatasetKind::NgsPassing,
        DatasetKind::NgsReceiving,
        DatasetKind::DepthChart,
        DatasetKind::PfrRushing,
        DatasetKind::PfrPassing,
        DatasetKind::PfrReceiving,
        DatasetKind::Snaps,
        DatasetKind::GameOdds,
        DatasetKind::Ftn,
        DatasetKind::WeeklyRosters,
        DatasetKind::PlayerIds,
    ];

    /// Registry key.
    pub fn key(self) -> &'static str {
        match self {
            DatasetKind::PlayByPlay => "pbp",
            DatasetKind::Players => "players",
            DatasetKind::Weekly => "weekly",
            DatasetKind::Combine => "combine",
            DatasetKind::Injuries => "injuries",
            DatasetKind::NgsRushing => "ngs_rushing",
            DatasetKind::NgsPassing => "ngs_passing",
            DatasetKind::NgsReceiving => "ngs_receiving",
            DatasetKind::DepthChart => "depth_chart",
            DatasetKind::PfrRushing => "pfr_rushing",
            DatasetKind::PfrPassing => "pfr_passing",
            DatasetKind::PfrReceiving => "pfr_receiving",
            DatasetKind::Snaps => "snaps",
            DatasetKind::GameOdds => "odds",
            DatasetKind::Ftn => "ftn",
            DatasetKind::WeeklyRosters => "weekly_rosters",
            DatasetKind::PlayerIds => "player_ids",
        }
    }

    /// Format fetched when the caller does not override it.
    pub fn default_format(self) -> FileFormat {
        match self {
            DatasetKind::NgsRushing | DatasetKind::NgsPassing | DatasetKind::NgsReceiving => {
                FileFormat::GzippedCsv
            }
            _ => FileFormat::Csv,
        }
    }

    /// Whether the upstream publishes this dataset in `format`.
    pub fn supports(self, format: FileFormat) -> bool {
        match self {
            // next-gen stats are never published as plain CSV
            DatasetKind::NgsRushing | DatasetKind::NgsPassing | DatasetKind::NgsReceiving => {
                format != FileFormat::Csv
            }
            // single files on third-party hosts
            DatasetKind::GameOdds | DatasetKind::PlayerIds => format == FileFormat::Csv,
            _ => true,
        }
    }

    /// Build the remote descriptor for one partition of this dataset.
    pub fn fetch_unit(
        self,
        partition: Partition,
        format: Option<FileFormat>,
    ) -> Result<FetchUnit, UnitPlanError> {
        let format = format.unwrap_or(self.default_format());
        if !self.supports(format) {
            return Err(UnsupportedFormat { dataset: self, format }.into());
        }
        let ext = format.remote_ext();

        let release = |asset: String| FetchUnit {
            host: RELEASE_HOST.to_string(),
            path: format!("{RELEASE_PREFIX}/{asset}.{ext}"),
            format,
        };
        let fixed = |host: &str, path: &str| FetchUnit {
            host: host.to_string(),
            path: path.to_string(),
            format,
        };

        let unit = match (self, partition) {
            (DatasetKind::PlayByPlay, Partition::Year(y)) => release(format!("pbp/play_by_play_{y}")),
            (DatasetKind::Weekly, Partition::Year(y)) => {
                release(format!("player_stats/player_stats_{y}"))
            }
            (DatasetKind::Injuries, Partition::Year(y)) => release(format!("injuries/injuries_{y}")),
            (DatasetKind::NgsRushing, Partition::Year(y)) => ngs(release, y, "rushing"),
            (DatasetKind::NgsPassing, Partition::Year(y)) => ngs(release, y, "passing"),
            (DatasetKind::NgsReceiving, Partition::Year(y)) => ngs(release, y, "receiving"),
            (DatasetKind::DepthChart, Partition::Year(y)) => {
                release(format!("depth_charts/depth_charts_{y}"))
            }
            (DatasetKind::PfrRushing, Partition::Year(y)) => pfr(release, y, PfrSplit::Rush),
            (DatasetKind::PfrPassing, Partition::Year(y)) => pfr(release, y, PfrSplit::Pass),
            (DatasetKind::PfrReceiving, Partition::Year(y)) => pfr(release, y, PfrSplit::Rec),
            (DatasetKind::Snaps, Partition::Year(y)) => {
                release(format!("snap_counts/snap_counts_{y}"))
            }
            (DatasetKind::Ftn, Partition::Year(y)) => {
                release(format!("ftn_charting/ftn_charting_{y}"))
            }
            (DatasetKind::WeeklyRosters, Partition::Year(y)) => {
                release(format!("weekly_rosters/roster_weekly_{y}"))
            }

            (DatasetKind::Players, Partition::Singleton) => release("players/players".into()),
            (DatasetKind::Combine, Partition::Singleton) => release("combine/combine".into()),
            (DatasetKind::GameOdds, Partition::Singleton) => fixed(ODDS_HOST, ODDS_PATH),
            (DatasetKind::PlayerIds, Partition::Singleton) => {
                fixed(PLAYER_IDS_HOST, PLAYER_IDS_PATH)
            }

            (
                DatasetKind::Players
                | DatasetKind::Combine
                | DatasetKind::GameOdds
                | DatasetKind::PlayerIds,
                Partition::Year(_),
            ) => {
                return Err(PartitionMismatch { dataset: self, expected: "non-yearly", partition }
                    .into());
            }
            (_, Partition::Singleton) => {
                return Err(PartitionMismatch { dataset: self, expected: "yearly", partition }
                    .into());
            }
        };
        Ok(unit)
    }
}

fn ngs(release: impl Fn(String) -> FetchUnit, year: i32, stat: &str) -> FetchUnit {
    release(format!("nextgen_stats/ngs_{year}_{stat}"))
}

fn pfr(release: impl Fn(String) -> FetchUnit, year: i32, split: PfrSplit) -> FetchUnit {
    release(format!("pfr_advstats/advstats_week{}{year}", split.suffix()))
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
