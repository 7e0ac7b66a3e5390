// tests/end_to_end.rs
//
// Real fetcher + local object store, with every upstream host pinned to a
// mock server.
//
use std::io::Write;

use flate2::{Compression, write::GzEncoder};
use mockito::{Matcher, Server};
use nfl_sync::config::options::SyncOptions;
use nfl_sync::core::{FetchError, Fetcher, RemoteSource, Scheme};
use nfl_sync::engine::{Syncer, UnitStatus};
use nfl_sync::specs::Registry;
use nfl_sync::store::ObjectStoreWriter;

struct Pinned {
    fetcher: Fetcher,
    host: String,
}

impl RemoteSource for Pinned {
    fn get(&self, _host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        self.fetcher.fetch(&self.host, path, self.fetcher.max_redirects())
    }
}

const PREFIX: &str = "/nflverse/nflverse-data/releases/download";

#[test]
fn redirected_gzip_release_lands_decompressed_on_disk() {
    let mut server = Server::new();
    let csv = "player_gsis_id,season,week\n00-0036355,2023,1\n";
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(csv.as_bytes()).unwrap();
    let gz = enc.finish().unwrap();

    let _release = server
        .mock("GET", format!("{PREFIX}/nextgen_stats/ngs_2023_receiving.csv.gz").as_str())
        .with_status(302)
        .with_header("Location", &format!("{}/cdn/ngs_2023_receiving.csv.gz?token=t1", server.url()))
        .create();
    let cdn = server
        .mock("GET", "/cdn/ngs_2023_receiving.csv.gz")
        .match_query(Matcher::UrlEncoded("token".into(), "t1".into()))
        .with_status(200)
        .with_body(gz)
        .expect(1)
        .create();
    let _pbp = server
        .mock("GET", format!("{PREFIX}/pbp/play_by_play_2023.csv").as_str())
        .with_status(404)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let writer = ObjectStoreWriter::local(dir.path()).unwrap();
    let source = Pinned {
        fetcher: Fetcher::with_scheme(Scheme::Http, 5).unwrap(),
        host: server.host_with_port(),
    };
    let opts = SyncOptions {
        current_year: 2023,
        datasets: vec!["ngs_receiving".into(), "pbp".into()],
        ..SyncOptions::default()
    };

    let report = Syncer::new(Registry::global(), &source, &writer, opts)
        .refresh_current(None)
        .unwrap();

    cdn.assert();
    let stored = std::fs::read_to_string(
        dir.path().join("receiving_next_gen_stats").join("2023.csv"),
    )
    .unwrap();
    assert_eq!(stored, csv);

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.units[0].status, UnitStatus::Stored { bytes: csv.len() });
    let failed = report.failures().next().unwrap();
    assert_eq!(failed.key, "play_by_play/2023.csv");
    assert!(!dir.path().join("play_by_play").join("2023.csv").exists());
}
