// src/specs/registry.rs
use std::sync::OnceLock;

use crate::engine::types::{Partition, Partitioning, storage_key};
use crate::specs::datasets::DatasetKind;

#[derive(Debug, thiserror::Error)]
#[error("Unknown dataset kind: {0}")]
pub struct UnknownDatasetKind(pub String);

/// Static description of one published dataset.
#[derive(Clone, Debug)]
pub struct DatasetDescriptor {
    pub key: &'static str,
    pub kind: DatasetKind,
    /// Name of the upstream loader routine. Informational only; fetching is
    /// dispatched on `kind`.
    pub remote_method_name: Option<&'static str>,
    pub storage_table: &'static str,
    /// Natural key of the rows, for downstream loaders.
    pub uniqueness_columns: &'static [&'static str],
    pub partitioning: Partitioning,
    /// Key of the "current period" object; `{year}` stands for the current season.
    pub current_key_template: &'static str,
}

impl DatasetDescriptor {
    pub fn is_yearly(&self) -> bool {
        matches!(self.partitioning, Partitioning::Yearly { .. })
    }

    pub fn min_year(&self) -> Option<i32> {
        match self.partitioning {
            Partitioning::Yearly { min_year } => Some(min_year),
            Partitioning::Singleton => None,
        }
    }

    /// All partitions of a full backfill, ascending.
    pub fn partitions(&self, current_year: i32) -> Vec<Partition> {
        match self.partitioning {
            Partitioning::Yearly { min_year } => (min_year..=current_year).map(Partition::Year).collect(),
            Partitioning::Singleton => vec![Partition::Singleton],
        }
    }

    /// The one partition a refresh rewrites.
    pub fn current_partition(&self, current_year: i32) -> Partition {
        match self.partitioning {
            Partitioning::Yearly { .. } => Partition::Year(current_year),
            Partitioning::Singleton => Partition::Singleton,
        }
    }

    pub fn key_for(&self, partition: Partition) -> String {
        storage_key(self.storage_table, partition)
    }

    pub fn current_key(&self, current_year: i32) -> String {
        self.current_key_template.replace("{year}", &current_year.to_string())
    }

    /// Staging-table DDL for the schema-management collaborator. Every column
    /// lands as text; typing happens in the downstream transform.
    pub fn create_statement(&self, schema: &str) -> String {
        let cols = self
            .uniqueness_columns
            .iter()
            .map(|c| format!("    {c} TEXT"))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "CREATE TABLE IF NOT EXISTS {schema}.{table} (\n{cols},\n    UNIQUE ({unique})\n);",
            table = self.storage_table,
            unique = self.uniqueness_columns.join(", "),
        )
    }
}

/// Fixed, ordered set of dataset descriptors.
pub struct Registry {
    entries: Vec<DatasetDescriptor>,
}

impl Registry {
    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| Registry { entries: builtin() })
    }

    pub fn lookup(&self, key: &str) -> Result<&DatasetDescriptor, UnknownDatasetKind> {
        self.entries
            .iter()
            .find(|d| d.key == key)
            .ok_or_else(|| UnknownDatasetKind(key.to_string()))
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DatasetDescriptor> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|d| d.key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn yearly(
    kind: DatasetKind,
    method: Option<&'static str>,
    table: &'static str,
    unique: &'static [&'static str],
    min_year: i32,
    current: &'static str,
) -> DatasetDescriptor {
    DatasetDescriptor {
        key: kind.key(),
        kind,
        remote_method_name: method,
        storage_table: table,
        uniqueness_columns: unique,
        partitioning: Partitioning::Yearly { min_year },
        current_key_template: current,
    }
}

fn singleton(
    kind: DatasetKind,
    method: Option<&'static str>,
    table: &'static str,
    unique: &'static [&'static str],
    current: &'static str,
) -> DatasetDescriptor {
    DatasetDescriptor {
        key: kind.key(),
        kind,
        remote_method_name: method,
        storage_table: table,
        uniqueness_columns: unique,
        partitioning: Partitioning::Singleton,
        current_key_template: current,
    }
}

fn builtin() -> Vec<DatasetDescriptor> {
    use DatasetKind::*;

    const SEASON_WEEK: &[&str] = &["player_gsis_id", "season", "week"];
    const PFR: &[&str] = &["pfr_game_id", "pfr_player_id"];

    vec![
        yearly(PlayByPlay, Some("pbp"), "play_by_play", &["play_id", "game_id"], 1999, "play_by_play/{year}.csv"),
        singleton(Players, Some("players"), "players", &["esb_id", "gsis_id"], "players/players.csv"),
        yearly(Weekly, Some("weekly"), "weekly", &["player_id", "week", "season"], 1999, "weekly/{year}.csv"),
        singleton(Combine, Some("combine"), "combine", &["player_name", "season", "draft_team", "pos"], "combine/combine.csv"),
        yearly(Injuries, Some("injuries"), "injuries", &["gsis_id", "season", "week", "team"], 2009, "injuries/{year}.csv"),
        yearly(NgsRushing, Some("ngs_rushing"), "rushing_next_gen_stats", SEASON_WEEK, 2016, "rushing_next_gen_stats/{year}.csv"),
        yearly(NgsPassing, Some("ngs_passing"), "passing_next_gen_stats", SEASON_WEEK, 2016, "passing_next_gen_stats/{year}.csv"),
        yearly(NgsReceiving, Some("ngs_receiving"), "receiving_next_gen_stats", SEASON_WEEK, 2016, "receiving_next_gen_stats/{year}.csv"),
        yearly(
            DepthChart,
            Some("depth_chart"),
            "depth_charts",
            &["gsis_id", "season", "week", "depth_position", "depth_team", "game_type", "formation", "club_code"],
            2001,
            "depth_charts/{year}.csv",
        ),
        yearly(PfrRushing, Some("pfr_rushing"), "rushing_pro_football_reference", PFR, 2018, "rushing_pro_football_reference/{year}.csv"),
        yearly(PfrPassing, Some("pfr_passing"), "passing_pro_football_reference", PFR, 2018, "passing_pro_football_reference/{year}.csv"),
        yearly(PfrReceiving, Some("pfr_receiving"), "receiving_pro_football_reference", PFR, 2018, "receiving_pro_football_reference/{year}.csv"),
        yearly(Snaps, Some("snaps"), "snaps", PFR, 2012, "snaps/{year}.csv"),
        singleton(GameOdds, Some("game_results"), "odds", &["insert_date", "game_id"], "odds/odds.csv"),
        yearly(Ftn, None, "ftn", &["ftn_game_id", "ftn_play_id"], 2022, "ftn/{year}.csv"),
        yearly(
            WeeklyRosters,
            None,
            "rosters",
            &["season", "week", "position", "full_name", "pfr_id", "status", "team"],
            2002,
            "rosters/{year}.csv",
        ),
        singleton(PlayerIds, None, "player_ids", &["mfl_id"], "player_ids/player_ids.csv"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves_to_itself() {
        let r = Registry::global();
        for key in r.keys() {
            assert_eq!(r.lookup(key).unwrap().key, key);
        }
        assert_eq!(r.len(), DatasetKind::ALL.len());
    }

    #[test]
    fn missing_key_is_unknown_kind() {
        let err = Registry::global().lookup("xfl_pbp").unwrap_err();
        assert_eq!(err.0, "xfl_pbp");
    }

    #[test]
    fn current_key_matches_partition_key() {
        for d in Registry::global().iter() {
            let p = d.current_partition(2024);
            assert_eq!(d.current_key(2024), d.key_for(p), "{}", d.key);
        }
    }

    #[test]
    fn backfill_partitions_are_ascending_and_inclusive() {
        let pbp = Registry::global().lookup("pbp").unwrap();
        let parts = pbp.partitions(2003);
        assert_eq!(
            parts,
            vec![
                Partition::Year(1999),
                Partition::Year(2000),
                Partition::Year(2001),
                Partition::Year(2002),
                Partition::Year(2003)
            ]
        );
        let odds = Registry::global().lookup("odds").unwrap();
        assert_eq!(odds.partitions(2003), vec![Partition::Singleton]);
    }

    #[test]
    fn year_floors() {
        let floor = |k: &str| Registry::global().lookup(k).unwrap().min_year();
        assert_eq!(floor("pbp"), Some(1999));
        assert_eq!(floor("depth_chart"), Some(2001));
        assert_eq!(floor("weekly_rosters"), Some(2002));
        assert_eq!(floor("injuries"), Some(2009));
        assert_eq!(floor("snaps"), Some(2012));
        assert_eq!(floor("ngs_passing"), Some(2016));
        assert_eq!(floor("pfr_receiving"), Some(2018));
        assert_eq!(floor("ftn"), Some(2022));
        assert_eq!(floor("players"), None);
    }

    #[test]
    fn ddl_names_schema_table_and_natural_key() {
        let ddl = Registry::global().lookup("snaps").unwrap().create_statement("raw");
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS raw.snaps ("));
        assert!(ddl.contains("UNIQUE (pfr_game_id, pfr_player_id)"));
    }
}
