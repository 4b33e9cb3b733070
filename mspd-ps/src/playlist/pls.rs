//! [PLS playlist](https://en.wikipedia.org/wiki/PLS_(file_format)) parsing
//!
//! A PLS file is an INI document with a `[playlist]` section whose
//! `File1`..`FileN` keys carry the stream URLs. Key names are compared
//! without regard to case.

use crate::{Error, Result};
use ini::{Ini, ParseOption};

/// Section holding the playlist entries
pub const PLS_SECTION: &str = "playlist";

/// Prefix of the keys that carry stream URLs
pub const PLS_ENTRY_PREFIX: &str = "file";

/// Extract stream URLs from a PLS document, in declaration order
///
/// Fails when the document is not valid INI or has no `[playlist]` section.
pub fn parse(content: &str) -> Result<Vec<String>> {
    // URLs are taken literally: no quote stripping, no backslash escapes
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    };

    let document = Ini::load_from_str_opt(content, options)
        .map_err(|e| Error::Playlist(e.to_string()))?;

    let section = document
        .section(Some(PLS_SECTION))
        .ok_or_else(|| Error::Playlist(format!("missing [{}] section", PLS_SECTION)))?;

    Ok(section
        .iter()
        .filter(|(key, _)| key.to_ascii_lowercase().starts_with(PLS_ENTRY_PREFIX))
        .map(|(_, value)| value.to_string())
        .collect())
}
