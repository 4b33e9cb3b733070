//! # MSPD Stream Player Library (mspd-ps)
//!
//! Plays one internet radio stream and keeps a tag file up to date with the
//! title of the track currently on air.
//!
//! **Flow:** the [`resolver`] turns a station URI (possibly a PLS or M3U
//! playlist) into a playable stream, a [`playback::PlaybackDriver`] plays it
//! and emits [`playback::PlaybackEvent`]s, and [`dispatch`] feeds title tags
//! through the [`tag`] normalizer into the tag file.

pub mod args;
pub mod dispatch;
pub mod error;
pub mod playback;
pub mod playlist;
pub mod resolver;
pub mod tag;

pub use error::{Error, Result};
