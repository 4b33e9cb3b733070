//! Playback engine interface
//!
//! The engine owns the stream connection, decoding, buffering and audio
//! output. The player only starts it and listens to what it reports.

#[cfg(feature = "playbin")]
pub mod playbin;

use crate::Result;
use futures::stream::BoxStream;

#[cfg(feature = "playbin")]
pub use playbin::PlaybinDriver;

/// Events reported by the playback engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Stream metadata changed; `title` is absent when the tag list had none
    TagUpdated { title: Option<String> },

    /// The stream ended
    EndOfStream,

    /// The engine reported an error
    Error { message: String },

    /// Anything the player does not act on
    Other,
}

/// Stream of engine events, delivered one at a time in engine order
pub type PlaybackEvents = BoxStream<'static, PlaybackEvent>;

/// A playback engine that can play a URI and report events
pub trait PlaybackDriver {
    /// Start playing `uri`, replacing anything currently playing
    fn play(&mut self, uri: &str) -> Result<PlaybackEvents>;

    /// Stop playback and release the engine's resources
    fn stop(&mut self) -> Result<()>;
}
