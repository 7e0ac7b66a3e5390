// src/core/net.rs
// HTTP GET with explicit, bounded redirect following.

use std::time::Duration;

use reqwest::{StatusCode, blocking::Client, header::LOCATION, redirect::Policy};
use url::Url;

use crate::config::consts::USER_AGENT;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Any response other than 200 or 302.
    #[error("Request failed with status: {status}, {reason}")]
    RemoteFetchFailed { status: u16, reason: String },

    /// Redirect budget exhausted before a terminal response.
    #[error("Too many redirects (last hop {host}{path})")]
    TooManyRedirects { host: String, path: String },

    /// 302 without a usable `Location` header.
    #[error("Invalid redirect from {host}{path}: {detail}")]
    InvalidRedirect { host: String, path: String, detail: String },

    /// Connect, TLS or body read failure.
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Something that can hand back the bytes living at `host` + `path`.
/// The orchestrator only talks to this, so tests can swap the network out.
pub trait RemoteSource: Send + Sync {
    fn get(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Https,
    /// Plain HTTP. Only meant for local test servers.
    Http,
}

impl Scheme {
    fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

pub struct Fetcher {
    client: Client,
    scheme: Scheme,
    max_redirects: u32,
}

impl Fetcher {
    /// HTTPS fetcher with the given redirect budget.
    pub fn new(max_redirects: u32) -> Result<Self, FetchError> {
        Self::with_scheme(Scheme::Https, max_redirects)
    }

    pub fn with_scheme(scheme: Scheme, max_redirects: u32) -> Result<Self, FetchError> {
        // Redirects are followed by hand; no idle pooling so every hop
        // releases its socket before the next one opens.
        let client = Client::builder()
            .redirect(Policy::none())
            .pool_max_idle_per_host(0)
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| FetchError::Transport { url: String::new(), source })?;
        Ok(Self { client, scheme, max_redirects })
    }

    pub fn max_redirects(&self) -> u32 {
        self.max_redirects
    }

    /// GET `path` from `host`, following up to `max_redirects - 1` redirects.
    ///
    /// * 200 – body is returned verbatim
    /// * 302 – `Location` is split into host and path (+ `?query`) and fetched
    ///   with one less redirect left
    /// * anything else – [`FetchError::RemoteFetchFailed`]
    ///
    /// With `max_redirects == 0` no request is made at all.
    pub fn fetch(&self, host: &str, path: &str, max_redirects: u32) -> Result<Vec<u8>, FetchError> {
        logf!("Requesting data for host: {host} path: {path}");

        if max_redirects == 0 {
            return Err(FetchError::TooManyRedirects {
                host: host.to_string(),
                path: path.to_string(),
            });
        }

        let url = format!("{}://{}{}", self.scheme.as_str(), host, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = resp.status();
        logd!("Status: {} {}", status.as_u16(), status.canonical_reason().unwrap_or(""));

        match status {
            StatusCode::OK => {
                let body = resp
                    .bytes()
                    .map_err(|source| FetchError::Transport { url: url.clone(), source })?;
                Ok(body.to_vec())
            }
            StatusCode::FOUND => {
                let location = resp
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                drop(resp);

                let location = location.ok_or_else(|| FetchError::InvalidRedirect {
                    host: host.to_string(),
                    path: path.to_string(),
                    detail: "missing Location header".into(),
                })?;
                logf!("Redirecting to {location}");

                let (next_host, next_path) = split_location(&url, &location).ok_or_else(|| {
                    FetchError::InvalidRedirect {
                        host: host.to_string(),
                        path: path.to_string(),
                        detail: format!("unparseable Location: {location}"),
                    }
                })?;
                self.fetch(&next_host, &next_path, max_redirects - 1)
            }
            other => Err(FetchError::RemoteFetchFailed {
                status: other.as_u16(),
                reason: other.canonical_reason().unwrap_or("").to_string(),
            }),
        }
    }
}

impl RemoteSource for Fetcher {
    fn get(&self, host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch(host, path, self.max_redirects)
    }
}

/// Resolve a `Location` header against the URL that produced it and split
/// it into `host[:port]` and `path[?query]`. Fragments are dropped.
pub fn split_location(base: &str, location: &str) -> Option<(String, String)> {
    let base = Url::parse(base).ok()?;
    let next = base.join(location).ok()?;

    let mut host = next.host_str()?.to_string();
    if let Some(port) = next.port() {
        host.push(':');
        host.push_str(&port.to_string());
    }

    let mut path = next.path().to_string();
    if let Some(q) = next.query() {
        path.push('?');
        path.push_str(q);
    }
    Some((host, path))
}
