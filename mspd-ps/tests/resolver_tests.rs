//! Playlist resolution tests
//!
//! The resolver logic is driven through a scripted fetcher; the reqwest
//! fetcher is exercised against a local axum server posing as a station.

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, head};
use axum::Router;
use mspd_common::config::PlayerConfig;
use mspd_ps::resolver::{select_stream, HttpFetcher, PlaylistFetch, PlaylistResolver};
use mspd_ps::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Scripted fetcher
// ============================================================================

/// Fetcher returning canned answers and counting requests
#[derive(Default)]
struct ScriptedFetcher {
    content_type: Option<String>,
    probe_fails: bool,
    body: Option<String>,
    probes: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedFetcher {
    fn with_type(content_type: &str, body: Option<&str>) -> Self {
        Self {
            content_type: Some(content_type.to_string()),
            body: body.map(str::to_string),
            ..Default::default()
        }
    }

    fn requests(&self) -> usize {
        self.probes.load(Ordering::SeqCst) + self.fetches.load(Ordering::SeqCst)
    }
}

impl PlaylistFetch for &ScriptedFetcher {
    async fn content_type(&self, _uri: &str) -> Result<Option<String>> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.probe_fails {
            return Err(Error::Playlist("connection refused".to_string()));
        }
        Ok(self.content_type.clone())
    }

    async fn body(&self, _uri: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.body
            .clone()
            .ok_or_else(|| Error::Playlist("body unavailable".to_string()))
    }
}

const STATION: &str = "http://radio.example/station";

#[tokio::test]
async fn test_raw_stream_scheme_is_not_probed() {
    let fetcher = ScriptedFetcher::with_type("audio/x-scpls", Some("[playlist]\nfile1=x\n"));
    let resolver = PlaylistResolver::new(&fetcher);

    let streams = resolver.resolve("mms://media.example/live").await;

    assert_eq!(streams, vec!["mms://media.example/live"]);
    assert_eq!(fetcher.requests(), 0, "mms: URIs must not touch the network");
}

#[tokio::test]
async fn test_pls_entries_in_order() {
    let fetcher = ScriptedFetcher::with_type(
        "audio/x-scpls",
        Some("[playlist]\nfile1=A\nfile2=B\nother=ignored\n"),
    );
    let resolver = PlaylistResolver::new(&fetcher);

    assert_eq!(resolver.resolve(STATION).await, vec!["A", "B"]);
}

#[tokio::test]
async fn test_unparsable_pls_yields_nothing() {
    let fetcher = ScriptedFetcher::with_type("audio/x-scpls", Some("<html>moved</html>\n"));
    let resolver = PlaylistResolver::new(&fetcher);

    let streams = resolver.resolve(STATION).await;

    assert!(streams.is_empty());
    assert_eq!(select_stream(STATION, &streams), STATION);
}

#[tokio::test]
async fn test_pls_fetch_failure_falls_back_to_uri() {
    let fetcher = ScriptedFetcher::with_type("audio/x-scpls", None);
    let resolver = PlaylistResolver::new(&fetcher);

    assert_eq!(resolver.resolve(STATION).await, vec![STATION]);
}

#[tokio::test]
async fn test_m3u_entries() {
    let fetcher = ScriptedFetcher::with_type("audio/x-mpegurl", Some("A\nB\n"));
    let resolver = PlaylistResolver::new(&fetcher);

    assert_eq!(resolver.resolve(STATION).await, vec!["A", "B"]);
}

#[tokio::test]
async fn test_m3u_fetch_failure_falls_back_to_uri() {
    let fetcher = ScriptedFetcher::with_type("audio/x-mpegurl", None);
    let resolver = PlaylistResolver::new(&fetcher);

    assert_eq!(resolver.resolve(STATION).await, vec![STATION]);
}

#[tokio::test]
async fn test_unrecognised_content_type_returns_uri() {
    let fetcher = ScriptedFetcher::with_type("audio/mpeg", Some("A\nB\n"));
    let resolver = PlaylistResolver::new(&fetcher);

    assert_eq!(resolver.resolve(STATION).await, vec![STATION]);
    assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_content_type_returns_uri() {
    let fetcher = ScriptedFetcher::default();
    let resolver = PlaylistResolver::new(&fetcher);

    assert_eq!(resolver.resolve(STATION).await, vec![STATION]);
}

#[tokio::test]
async fn test_probe_failure_returns_uri() {
    let fetcher = ScriptedFetcher {
        probe_fails: true,
        ..ScriptedFetcher::with_type("audio/x-mpegurl", Some("A\n"))
    };
    let resolver = PlaylistResolver::new(&fetcher);

    assert_eq!(resolver.resolve(STATION).await, vec![STATION]);
    assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);
}

// ============================================================================
// HttpFetcher against a local station
// ============================================================================

const PLS_BODY: &str = "[playlist]\n\
                        NumberOfEntries=2\n\
                        File1=http://edge1.example/live\n\
                        Title1=Edge 1\n\
                        file2=http://edge2.example/live\n";

const M3U_BODY: &str = "#EXTM3U\n#EXTINF:-1,Live\nhttp://edge1.example/live.mp3\n";

fn station_router() -> Router {
    Router::new()
        .route(
            "/station.pls",
            get(|| async { ([(header::CONTENT_TYPE, "audio/x-scpls")], PLS_BODY) }),
        )
        .route(
            "/station.m3u",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "audio/x-mpegurl; charset=utf-8")],
                    M3U_BODY,
                )
            }),
        )
        .route(
            "/stream",
            get(|| async { ([(header::CONTENT_TYPE, "audio/mpeg")], "ID3") }),
        )
        .route(
            "/gone.m3u",
            head(|| async { [(header::CONTENT_TYPE, "audio/x-mpegurl")] })
                .get(|| async { StatusCode::NOT_FOUND }),
        )
        .route(
            "/agent.m3u",
            get(|headers: HeaderMap| async move {
                let agent = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("none")
                    .to_string();
                ([(header::CONTENT_TYPE, "audio/x-mpegurl")], agent)
            }),
        )
}

/// Serve the station router on an ephemeral port and return its base URL
async fn spawn_station() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, station_router()).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http_resolver() -> PlaylistResolver<HttpFetcher> {
    let fetcher = HttpFetcher::new(&PlayerConfig::default()).expect("Failed to build client");
    PlaylistResolver::new(fetcher)
}

#[tokio::test]
async fn test_http_pls_playlist() {
    let base = spawn_station().await;

    let streams = http_resolver().resolve(&format!("{}/station.pls", base)).await;

    assert_eq!(
        streams,
        vec!["http://edge1.example/live", "http://edge2.example/live"]
    );
}

#[tokio::test]
async fn test_http_m3u_playlist_with_charset() {
    let base = spawn_station().await;

    let streams = http_resolver().resolve(&format!("{}/station.m3u", base)).await;

    assert_eq!(streams, vec!["http://edge1.example/live.mp3"]);
}

#[tokio::test]
async fn test_http_direct_stream() {
    let base = spawn_station().await;
    let uri = format!("{}/stream", base);

    assert_eq!(http_resolver().resolve(&uri).await, vec![uri]);
}

#[tokio::test]
async fn test_http_playlist_fetch_error_falls_back() {
    let base = spawn_station().await;
    let uri = format!("{}/gone.m3u", base);

    assert_eq!(http_resolver().resolve(&uri).await, vec![uri]);
}

#[tokio::test]
async fn test_http_sends_configured_user_agent() {
    let base = spawn_station().await;
    let config = PlayerConfig {
        user_agent: "mspd-test/1.0".to_string(),
        ..PlayerConfig::default()
    };
    let resolver = PlaylistResolver::new(HttpFetcher::new(&config).unwrap());

    let streams = resolver.resolve(&format!("{}/agent.m3u", base)).await;

    assert_eq!(streams, vec!["mspd-test/1.0"]);
}

#[tokio::test]
async fn test_http_unreachable_host_falls_back() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let uri = format!("http://{}/station.pls", addr);

    assert_eq!(http_resolver().resolve(&uri).await, vec![uri]);
}
