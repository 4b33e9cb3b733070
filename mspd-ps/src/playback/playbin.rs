//! GStreamer `playbin` playback driver

use super::{PlaybackDriver, PlaybackEvent, PlaybackEvents};
use crate::{Error, Result};
use futures::StreamExt;
use gstreamer as gst;
use gstreamer::prelude::*;
use tracing::{debug, info, warn};

/// Plays URIs through a GStreamer `playbin` element
pub struct PlaybinDriver {
    playbin: Option<gst::Element>,
}

impl PlaybinDriver {
    /// Initialise GStreamer and create an idle driver
    pub fn new() -> Result<Self> {
        gst::init().map_err(|e| Error::Playback(format!("GStreamer init failed: {}", e)))?;
        debug!("GStreamer {} initialised", gst::version_string());
        Ok(Self { playbin: None })
    }
}

impl PlaybackDriver for PlaybinDriver {
    fn play(&mut self, uri: &str) -> Result<PlaybackEvents> {
        self.stop()?;

        info!("Creating playbin for: {}", uri);
        let playbin = gst::ElementFactory::make("playbin")
            .name("player")
            .property("uri", uri)
            .build()
            .map_err(|e| Error::Playback(format!("Failed to create playbin: {}", e)))?;

        let bus = playbin
            .bus()
            .ok_or_else(|| Error::Playback("playbin has no bus".to_string()))?;

        // Subscribe before starting so no early tag is missed
        let events = bus.stream().map(|message| translate(&message));

        playbin
            .set_state(gst::State::Playing)
            .map_err(|e| Error::Playback(format!("Failed to start playback: {}", e)))?;

        self.playbin = Some(playbin);
        Ok(events.boxed())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(playbin) = self.playbin.take() {
            debug!("Stopping playbin");
            playbin
                .set_state(gst::State::Null)
                .map_err(|e| Error::Playback(format!("Failed to stop playback: {}", e)))?;
        }
        Ok(())
    }
}

impl Drop for PlaybinDriver {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("{}", e);
        }
    }
}

/// Map a bus message to a [`PlaybackEvent`]
fn translate(message: &gst::Message) -> PlaybackEvent {
    use gst::MessageView;

    match message.view() {
        MessageView::Tag(tag) => {
            let tags = tag.tags();
            let title = tags
                .get::<gst::tags::Title>()
                .map(|value| value.get().to_string());
            PlaybackEvent::TagUpdated { title }
        }
        MessageView::Eos(_) => PlaybackEvent::EndOfStream,
        MessageView::Error(err) => {
            let source = err
                .src()
                .map(|s| s.path_string().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let message = match err.debug() {
                Some(debug) => format!("{} ({}): {}", err.error(), source, debug),
                None => format!("{} ({})", err.error(), source),
            };
            PlaybackEvent::Error { message }
        }
        _ => PlaybackEvent::Other,
    }
}
