// tests/fetch_redirects.rs
//
// Redirect and status handling of the fetcher against local mock servers.
//
use mockito::{Matcher, Server};
use nfl_sync::core::{FetchError, Fetcher, Scheme};

fn fetcher() -> Fetcher {
    Fetcher::with_scheme(Scheme::Http, 5).unwrap()
}

#[test]
fn ok_returns_body_verbatim() {
    let mut server = Server::new();
    let body: &[u8] = b"play_id,game_id\n1,2019_01_GB_CHI\n";
    let m = server
        .mock("GET", "/nflverse/pbp/play_by_play_2019.csv")
        .with_status(200)
        .with_body(body)
        .expect(1)
        .create();

    let got = fetcher()
        .fetch(&server.host_with_port(), "/nflverse/pbp/play_by_play_2019.csv", 5)
        .unwrap();

    m.assert();
    assert_eq!(got, body);
}

#[test]
fn single_redirect_to_other_host() {
    let mut release = Server::new();
    let mut cdn = Server::new();

    let hop = release
        .mock("GET", "/releases/download/players/players.csv")
        .with_status(302)
        .with_header("Location", &format!("{}/assets/players.csv", cdn.url()))
        .expect(1)
        .create();
    let asset = cdn
        .mock("GET", "/assets/players.csv")
        .with_status(200)
        .with_body("gsis_id,esb_id\n")
        .expect(1)
        .create();

    let got = fetcher()
        .fetch(&release.host_with_port(), "/releases/download/players/players.csv", 5)
        .unwrap();

    hop.assert();
    asset.assert();
    assert_eq!(got, b"gsis_id,esb_id\n");
}

#[test]
fn redirect_query_is_carried_to_next_hop() {
    let mut server = Server::new();
    let _hop = server
        .mock("GET", "/a.csv")
        .with_status(302)
        .with_header("Location", &format!("{}/signed/a.csv?X-Amz-Signature=abc&expires=9", server.url()))
        .create();
    let signed = server
        .mock("GET", "/signed/a.csv")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("X-Amz-Signature".into(), "abc".into()),
            Matcher::UrlEncoded("expires".into(), "9".into()),
        ]))
        .with_status(200)
        .with_body("ok")
        .expect(1)
        .create();

    let got = fetcher().fetch(&server.host_with_port(), "/a.csv", 5).unwrap();

    signed.assert();
    assert_eq!(got, b"ok");
}

#[test]
fn redirect_chain_longer_than_budget_fails() {
    let mut server = Server::new();
    let url = server.url();

    // /r0 -> /r1 -> ... -> /r6, every hop a 302
    let hops: Vec<_> = (0..6)
        .map(|i| {
            let expected = if i < 5 { 1 } else { 0 };
            server
                .mock("GET", format!("/r{i}").as_str())
                .with_status(302)
                .with_header("Location", &format!("{url}/r{}", i + 1))
                .expect(expected)
                .create()
        })
        .collect();

    let err = fetcher().fetch(&server.host_with_port(), "/r0", 5).unwrap_err();

    assert!(matches!(err, FetchError::TooManyRedirects { .. }), "got {err:?}");
    // five requests went out, the sixth hop was never requested
    for m in &hops {
        m.assert();
    }
}

#[test]
fn not_found_carries_status_and_reason() {
    let mut server = Server::new();
    let _m = server.mock("GET", "/missing.csv").with_status(404).create();

    let err = fetcher().fetch(&server.host_with_port(), "/missing.csv", 5).unwrap_err();
    match err {
        FetchError::RemoteFetchFailed { status, reason } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected RemoteFetchFailed, got {other:?}"),
    }
}

#[test]
fn server_error_is_not_retried() {
    let mut server = Server::new();
    let m = server.mock("GET", "/games.csv").with_status(500).expect(1).create();

    let err = fetcher().fetch(&server.host_with_port(), "/games.csv", 5).unwrap_err();

    m.assert();
    assert!(matches!(err, FetchError::RemoteFetchFailed { status: 500, .. }));
}

#[test]
fn only_302_is_followed() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/moved.csv")
        .with_status(301)
        .with_header("Location", &format!("{}/new.csv", server.url()))
        .create();
    let new = server.mock("GET", "/new.csv").expect(0).create();

    let err = fetcher().fetch(&server.host_with_port(), "/moved.csv", 5).unwrap_err();

    new.assert();
    assert!(matches!(err, FetchError::RemoteFetchFailed { status: 301, .. }));
}

#[test]
fn redirect_without_location_is_invalid() {
    let mut server = Server::new();
    let _m = server.mock("GET", "/x.csv").with_status(302).create();

    let err = fetcher().fetch(&server.host_with_port(), "/x.csv", 5).unwrap_err();
    assert!(matches!(err, FetchError::InvalidRedirect { .. }));
}

#[test]
fn remote_source_uses_configured_budget() {
    use nfl_sync::core::RemoteSource;

    let mut server = Server::new();
    let url = server.url();
    let first = server
        .mock("GET", "/a")
        .with_status(302)
        .with_header("Location", &format!("{url}/b"))
        .expect(1)
        .create();
    let second = server.mock("GET", "/b").expect(0).create();

    // budget of one: the first response must already be terminal
    let f = Fetcher::with_scheme(Scheme::Http, 1).unwrap();
    let err = f.get(&server.host_with_port(), "/a").unwrap_err();

    first.assert();
    second.assert();
    assert!(matches!(err, FetchError::TooManyRedirects { .. }));
}
