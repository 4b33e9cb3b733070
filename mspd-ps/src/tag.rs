//! Track title normalisation and the tag file
//!
//! Radio stations stuff all kinds of padding into their title tags: double
//! spaces between artist and title, `***` followed by advertising, raw
//! ampersands. [`normalize_title`] turns that into a short presentable line
//! and [`TagSink`] writes it to the tag file.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Separator stations use between artist and title
const SEGMENT_SEPARATOR: &str = "  ";

/// Everything after this marker is dropped
const TRAILER_MARKER: &str = "***";

/// Clean up a raw stream title
///
/// 1. `&` becomes `and`.
/// 2. The title is split on double spaces. The first blank segment turns into
///    a single `-`; later blank segments are dropped. Other segments are kept
///    and joined with single spaces.
/// 3. Everything from the first `***` on is dropped and the rest trimmed.
pub fn normalize_title(raw: &str) -> String {
    let replaced = raw.replace('&', "and");

    let mut title = String::with_capacity(replaced.len() + 2);
    let mut dash_pending = true;
    for segment in replaced.split(SEGMENT_SEPARATOR) {
        if segment.trim().is_empty() {
            if dash_pending {
                title.push('-');
                dash_pending = false;
            }
            continue;
        }
        title.push_str(segment);
        title.push(' ');
    }

    title
        .split(TRAILER_MARKER)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Result of offering a tag to the [`TagSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// The tag carried no title
    NoTitle,

    /// The title normalised to nothing
    Empty,

    /// No tag file configured
    Disabled,

    /// The tag file now contains this title
    Written(String),
}

/// Writes the current track title to the tag file
///
/// Each write replaces the whole file. Without a configured path the sink
/// never touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct TagSink {
    path: Option<PathBuf>,
    last_title: Option<String>,
}

impl TagSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            last_title: None,
        }
    }

    /// Tag file path, if tag writing is enabled
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Last title successfully written
    pub fn last_title(&self) -> Option<&str> {
        self.last_title.as_deref()
    }

    /// Normalise a raw title and write it to the tag file
    ///
    /// An empty title counts as no title.
    pub async fn update(&mut self, raw_title: Option<&str>) -> Result<TagOutcome> {
        let Some(raw_title) = raw_title.filter(|title| !title.is_empty()) else {
            return Ok(TagOutcome::NoTitle);
        };

        let title = normalize_title(raw_title);
        if title.is_empty() {
            return Ok(TagOutcome::Empty);
        }

        let Some(path) = self.path.as_ref() else {
            return Ok(TagOutcome::Disabled);
        };

        tokio::fs::write(path, title.as_bytes())
            .await
            .map_err(|source| Error::TagWrite {
                path: path.clone(),
                source,
            })?;
        debug!("Wrote tag '{}' to {}", title, path.display());

        self.last_title = Some(title.clone());
        Ok(TagOutcome::Written(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ampersand_becomes_and() {
        assert_eq!(normalize_title("Rock & Roll"), "Rock and Roll");
        assert_eq!(normalize_title("Simon&Garfunkel"), "SimonandGarfunkel");
    }

    #[test]
    fn test_double_space_joined_with_single_space() {
        assert_eq!(normalize_title("Artist  Title***extra"), "Artist Title");
    }

    #[test]
    fn test_blank_segment_becomes_dash() {
        assert_eq!(normalize_title("Artist    Title***extra"), "Artist -Title");
    }

    #[test]
    fn test_only_first_blank_segment_emits_dash() {
        // Six spaces give two blank segments, four spaces a third one
        assert_eq!(normalize_title("A      B    C"), "A -B C");
    }

    #[test]
    fn test_odd_spacing_keeps_leading_space_of_segment() {
        // "A   B" splits into "A" and " B"
        assert_eq!(normalize_title("A   B"), "A  B");
    }

    #[test]
    fn test_trailer_dropped() {
        assert_eq!(
            normalize_title("Song Title *** www.station.example ***"),
            "Song Title"
        );
    }

    #[test]
    fn test_leading_blank_segment() {
        assert_eq!(normalize_title("    Title"), "-Title");
    }

    #[test]
    fn test_degenerate_titles() {
        assert_eq!(normalize_title(""), "-");
        assert_eq!(normalize_title("***advert"), "");
        assert_eq!(normalize_title("***  "), "");
    }

    #[test]
    fn test_plain_title_unchanged() {
        assert_eq!(normalize_title("Daft Punk - One More Time"), "Daft Punk - One More Time");
    }

    #[tokio::test]
    async fn test_update_without_title() {
        let mut sink = TagSink::new(None);
        assert_eq!(sink.update(None).await.unwrap(), TagOutcome::NoTitle);
    }

    #[tokio::test]
    async fn test_update_with_empty_title() {
        let mut sink = TagSink::new(None);
        assert_eq!(sink.update(Some("")).await.unwrap(), TagOutcome::NoTitle);
    }

    #[tokio::test]
    async fn test_update_disabled_sink() {
        let mut sink = TagSink::new(None);
        assert!(!sink.is_enabled());
        assert_eq!(
            sink.update(Some("Artist  Title")).await.unwrap(),
            TagOutcome::Disabled
        );
        assert!(sink.last_title().is_none());
    }

    #[tokio::test]
    async fn test_update_empty_title_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tag");
        let mut sink = TagSink::new(Some(path.clone()));

        assert_eq!(sink.update(Some("***")).await.unwrap(), TagOutcome::Empty);
        assert!(!path.exists());
    }
}
