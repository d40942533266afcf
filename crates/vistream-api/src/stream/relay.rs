//! Range Relay: origin response → client response, streamed.
//!
//! Status and headers are fixed before the first body byte. The body is handed
//! to hyper as a stream, so it is only polled as fast as the client reads and
//! is dropped, closing the origin connection, as soon as the client goes away.

use super::origin::{OriginBody, OriginResponse, ResponseKind};
use axum::{
    body::Body,
    http::{header, Method, StatusCode},
    response::Response,
};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use vistream_core::models::VideoAsset;
use vistream_core::AppError;

/// Build the client response for an origin answer. `HEAD` gets headers only.
pub fn relay(
    origin: OriginResponse,
    asset: &VideoAsset,
    method: &Method,
    cache_max_age_secs: u64,
) -> Result<Response, AppError> {
    let content_type = origin
        .content_type
        .clone()
        .unwrap_or_else(|| asset.mime_type.clone());

    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", cache_max_age_secs),
        );

    builder = match (origin.kind, origin.content_range.as_deref()) {
        (ResponseKind::Partial, Some(content_range)) => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_RANGE, content_range),
        _ => builder.status(StatusCode::OK),
    };

    if let Some(length) = origin.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    let body = if *method == Method::HEAD {
        Body::empty()
    } else {
        Body::from_stream(RelayStream::new(origin.body, asset.id, origin.content_length))
    };

    builder
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build stream response: {}", e)))
}

/// Pass-through body stream that accounts for what was delivered.
///
/// An origin error is forwarded as a body error, which makes hyper abort the
/// connection instead of completing a truncated response. Being dropped before
/// the end means the client left; the origin body goes with it.
struct RelayStream {
    inner: OriginBody,
    video_id: i64,
    expected_len: Option<u64>,
    bytes_sent: u64,
    finished: bool,
    started: Instant,
}

impl RelayStream {
    fn new(inner: OriginBody, video_id: i64, expected_len: Option<u64>) -> Self {
        Self {
            inner,
            video_id,
            expected_len,
            bytes_sent: 0,
            finished: false,
            started: Instant::now(),
        }
    }

    fn duration_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_sent += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                let interrupted = AppError::StreamInterrupted(format!("origin read failed: {}", e));
                tracing::warn!(
                    error = %interrupted,
                    video_id = this.video_id,
                    bytes_sent = this.bytes_sent,
                    duration_ms = this.duration_ms(),
                    "Origin stream ended abruptly, closing client connection"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                if let Some(expected) = this.expected_len.filter(|n| *n != this.bytes_sent) {
                    tracing::warn!(
                        video_id = this.video_id,
                        bytes_sent = this.bytes_sent,
                        expected_bytes = expected,
                        "Origin body length did not match Content-Length"
                    );
                } else {
                    tracing::debug!(
                        video_id = this.video_id,
                        bytes_sent = this.bytes_sent,
                        duration_ms = this.duration_ms(),
                        "Stream completed"
                    );
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(
                video_id = self.video_id,
                bytes_sent = self.bytes_sent,
                duration_ms = self.duration_ms(),
                "Client disconnected mid-stream, origin read cancelled"
            );
        }
    }
}
