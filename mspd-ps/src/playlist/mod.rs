//! Legacy internet radio playlist formats
//!
//! Stations frequently publish a playlist instead of the stream itself. The
//! server announces which one through the `Content-Type` header.

pub mod m3u;
pub mod pls;

/// Content type of a PLS playlist
pub const PLS_CONTENT_TYPE: &str = "audio/x-scpls";

/// Content type of an M3U playlist
pub const M3U_CONTENT_TYPE: &str = "audio/x-mpegurl";

/// Playlist format announced by a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Pls,
    M3u,
}

impl PlaylistKind {
    /// Classify a `Content-Type` header value
    ///
    /// Parameters (`; charset=...`) are ignored and the media type is compared
    /// case-insensitively. Returns `None` for anything that is not a playlist.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();

        if media_type.eq_ignore_ascii_case(PLS_CONTENT_TYPE) {
            Some(PlaylistKind::Pls)
        } else if media_type.eq_ignore_ascii_case(M3U_CONTENT_TYPE) {
            Some(PlaylistKind::M3u)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_content_types() {
        assert_eq!(
            PlaylistKind::from_content_type("audio/x-scpls"),
            Some(PlaylistKind::Pls)
        );
        assert_eq!(
            PlaylistKind::from_content_type("audio/x-mpegurl"),
            Some(PlaylistKind::M3u)
        );
    }

    #[test]
    fn test_parameters_and_case_are_ignored() {
        assert_eq!(
            PlaylistKind::from_content_type("Audio/X-SCPLS; charset=UTF-8"),
            Some(PlaylistKind::Pls)
        );
        assert_eq!(
            PlaylistKind::from_content_type(" audio/x-mpegurl ;charset=latin1"),
            Some(PlaylistKind::M3u)
        );
    }

    #[test]
    fn test_stream_types_are_not_playlists() {
        assert_eq!(PlaylistKind::from_content_type("audio/mpeg"), None);
        assert_eq!(PlaylistKind::from_content_type("audio/aacp"), None);
        assert_eq!(PlaylistKind::from_content_type(""), None);
    }
}
