//! View counting driven by playback events.

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use vistream_core::PlaybackEvents;

use super::VideoAssetStore;

/// Subscribes to playback starts and increments the matching view counter.
///
/// Failures are logged and dropped; a lost view count never affects playback.
pub struct ViewCountSubscriber;

impl ViewCountSubscriber {
    pub fn spawn(events: &PlaybackEvents, store: Arc<dyn VideoAssetStore>) -> JoinHandle<()> {
        let mut rx = events.subscribe();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Err(e) = store.increment_view_count(event.video_id).await {
                            tracing::warn!(
                                error = %e,
                                video_id = event.video_id,
                                "Failed to increment view count"
                            );
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped = skipped, "View counter lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("View count subscriber stopped");
        })
    }
}
