// src/config/consts.rs

// Net config
pub const RELEASE_HOST: &str = "github.com";
pub const RELEASE_PREFIX: &str = "/nflverse/nflverse-data/releases/download";
pub const ODDS_HOST: &str = "nflgamedata.com";
pub const ODDS_PATH: &str = "/games.csv";
pub const PLAYER_IDS_HOST: &str = "raw.githubusercontent.com";
pub const PLAYER_IDS_PATH: &str = "/dynastyprocess/data/master/files/db_playerids.csv";
pub const USER_AGENT: &str = concat!("nfl_sync/", env!("CARGO_PKG_VERSION"));

// Release hosting answers with one 302 to a CDN; 5 leaves plenty of headroom
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

// Environment
pub const ENV_BUCKET: &str = "NFL_DATA_BUCKET";
pub const ENV_SCHEMA: &str = "RAW_SCHEMA";
pub const DEFAULT_SCHEMA: &str = "raw";

// Concurrency
pub const DEFAULT_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 8;
