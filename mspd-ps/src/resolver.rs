//! Station URI resolution
//!
//! Turns the URI a station is configured with into the list of streams it
//! points to. Resolution never fails: network and fetch problems fall back to
//! playing the original URI, which is what the playback engine would have
//! been given without a playlist.

use crate::playlist::{m3u, pls, PlaylistKind};
use crate::Result;
use mspd_common::config::PlayerConfig;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Scheme prefix of raw streaming URIs that are never probed over HTTP
pub const RAW_STREAM_SCHEME: &str = "mms:";

/// HTTP access needed to resolve playlists
pub trait PlaylistFetch {
    /// Issue a header-only request and return the `Content-Type` value, if any
    fn content_type(&self, uri: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Fetch the full response body as text
    fn body(&self, uri: &str) -> impl Future<Output = Result<String>> + Send;
}

/// [`PlaylistFetch`] over a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeout and user agent
    pub fn new(config: &PlayerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl PlaylistFetch for HttpFetcher {
    async fn content_type(&self, uri: &str) -> Result<Option<String>> {
        let response = self.client.head(uri).send().await?;
        debug!("HEAD {} -> {}", uri, response.status());

        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string))
    }

    async fn body(&self, uri: &str) -> Result<String> {
        let response = self.client.get(uri).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Resolves station URIs to stream URIs
pub struct PlaylistResolver<F> {
    fetcher: F,
}

impl<F: PlaylistFetch> PlaylistResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Resolve `uri` to the streams it refers to, in playlist order
    ///
    /// - `mms:` URIs are returned unchanged without any request.
    /// - PLS and M3U playlists are fetched and parsed.
    /// - Anything else, and any fetch failure, yields `[uri]`.
    /// - A PLS document that cannot be parsed yields an empty list.
    pub async fn resolve(&self, uri: &str) -> Vec<String> {
        if uri.starts_with(RAW_STREAM_SCHEME) {
            debug!("Raw stream URI, skipping probe: {}", uri);
            return vec![uri.to_string()];
        }

        let content_type = match self.fetcher.content_type(uri).await {
            Ok(content_type) => content_type,
            Err(e) => {
                warn!("Could not probe {}: {}; playing it directly", uri, e);
                return vec![uri.to_string()];
            }
        };

        let kind = content_type.as_deref().and_then(PlaylistKind::from_content_type);
        debug!("Content type of {}: {:?} ({:?})", uri, content_type, kind);

        match kind {
            Some(PlaylistKind::Pls) => match self.fetcher.body(uri).await {
                Ok(body) => pls::parse(&body).unwrap_or_else(|e| {
                    warn!("Ignoring unreadable PLS playlist {}: {}", uri, e);
                    Vec::new()
                }),
                Err(e) => {
                    warn!("Could not fetch PLS playlist {}: {}", uri, e);
                    vec![uri.to_string()]
                }
            },
            Some(PlaylistKind::M3u) => match self.fetcher.body(uri).await {
                Ok(body) => m3u::parse(&body),
                Err(e) => {
                    warn!("Could not fetch M3U playlist {}: {}", uri, e);
                    vec![uri.to_string()]
                }
            },
            None => vec![uri.to_string()],
        }
    }
}

/// Pick the stream to play from a resolution result
///
/// The first entry wins. An empty result (an unreadable or empty playlist)
/// falls back to the original URI.
pub fn select_stream(uri: &str, entries: &[String]) -> String {
    match entries.first() {
        Some(first) => {
            if entries.len() > 1 {
                info!("Playlist has {} entries, using the first", entries.len());
            }
            first.clone()
        }
        None => {
            warn!("No streams found in {}, playing it directly", uri);
            uri.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_first_entry() {
        let entries = vec!["http://a/".to_string(), "http://b/".to_string()];
        assert_eq!(select_stream("http://station/", &entries), "http://a/");
    }

    #[test]
    fn test_select_falls_back_to_original() {
        assert_eq!(select_stream("http://station/", &[]), "http://station/");
    }
}
