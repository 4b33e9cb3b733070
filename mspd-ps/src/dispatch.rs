//! Playback event dispatch
//!
//! Consumes the engine's event stream one event at a time. Title tags go to
//! the [`TagSink`]; nothing that happens here stops playback.

use crate::playback::PlaybackEvent;
use crate::tag::{TagOutcome, TagSink};
use futures::{Stream, StreamExt};
use tracing::{debug, info, trace, warn};

/// Counters collected while dispatching events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Tag events received, with or without a title
    pub tags_seen: u64,

    /// Titles written to the tag file
    pub titles_written: u64,

    /// Tag file writes that failed
    pub write_failures: u64,
}

/// Dispatch events until the stream ends
pub async fn dispatch_events<S>(mut events: S, sink: &mut TagSink) -> DispatchStats
where
    S: Stream<Item = PlaybackEvent> + Unpin,
{
    let mut stats = DispatchStats::default();

    while let Some(event) = events.next().await {
        match event {
            PlaybackEvent::TagUpdated { title } => {
                stats.tags_seen += 1;
                match sink.update(title.as_deref()).await {
                    Ok(TagOutcome::Written(title)) => {
                        stats.titles_written += 1;
                        info!("Now playing: {}", title);
                    }
                    Ok(outcome) => trace!("Tag not written: {:?}", outcome),
                    Err(e) => {
                        stats.write_failures += 1;
                        warn!("{}", e);
                    }
                }
            }
            PlaybackEvent::EndOfStream => debug!("End of stream"),
            PlaybackEvent::Error { message } => warn!("Playback engine error: {}", message),
            PlaybackEvent::Other => {}
        }
    }

    stats
}
