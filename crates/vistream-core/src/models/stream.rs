use super::{ByteRange, Identity};

/// One inbound stream request, after parsing. Lives for a single HTTP request.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub video_id: i64,
    pub range: Option<ByteRange>,
    pub caller: Option<Identity>,
}

impl StreamRequest {
    /// A request counts as a playback start when it reads from the first byte.
    /// Seeks issue ranged requests further into the file and do not count.
    pub fn is_playback_start(&self) -> bool {
        self.range.as_ref().map_or(true, ByteRange::starts_at_zero)
    }
}
