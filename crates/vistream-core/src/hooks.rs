//! Playback hooks
//!
//! The proxy never touches view counters itself. It announces playback starts
//! on a broadcast channel and the metadata layer subscribes to them.

use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// A stream was established from the first byte of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackStarted {
    pub video_id: i64,
    /// Open id of the caller, if one was authenticated.
    pub caller: Option<String>,
}

/// Fan-out hub for playback events.
///
/// Publishing never blocks: with no subscribers the event is dropped, and slow
/// subscribers lag instead of applying backpressure to the request.
#[derive(Debug, Clone)]
pub struct PlaybackEvents {
    sender: broadcast::Sender<PlaybackStarted>,
}

impl PlaybackEvents {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: PlaybackStarted) {
        let video_id = event.video_id;
        if self.sender.send(event).is_err() {
            tracing::trace!(video_id = video_id, "No playback subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackStarted> {
        self.sender.subscribe()
    }
}

impl Default for PlaybackEvents {
    fn default() -> Self {
        Self::new()
    }
}
