//! In-process origin server standing in for S3/MinIO.
//!
//! Keys select behavior by their first path segment:
//! - `videos/...`       serves [`ASSET_SIZE`] deterministic bytes
//! - `slow-headers/...` waits [`SLOW_DELAY`] before answering
//! - `slow-body/...`    answers at once, then trickles the body over [`SLOW_DELAY`]
//! - `endless/...`      streams forever; drops are counted
//! - `unsatisfiable/...` answers 416, `broken/...` answers 500, `empty-206/...`
//!   answers 206 without `Content-Range`

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const ASSET_SIZE: usize = 4096;
pub const SLOW_DELAY: Duration = Duration::from_millis(1500);

/// Deterministic asset content: byte `i` is `i % 251`.
pub fn asset_bytes() -> Vec<u8> {
    (0..ASSET_SIZE).map(|i| (i % 251) as u8).collect()
}

#[derive(Default)]
pub struct OriginStats {
    pub hits: AtomicUsize,
    pub head_hits: AtomicUsize,
    pub endless_open: AtomicUsize,
    pub endless_dropped: AtomicUsize,
}

#[derive(Clone)]
struct OriginState {
    honor_ranges: bool,
    stats: Arc<OriginStats>,
}

pub struct MockOrigin {
    pub base_url: String,
    pub stats: Arc<OriginStats>,
}

impl MockOrigin {
    pub async fn start(honor_ranges: bool) -> Self {
        let stats = Arc::new(OriginStats::default());
        let state = OriginState {
            honor_ranges,
            stats: stats.clone(),
        };
        let app = Router::new()
            .route("/bucket/{*key}", get(serve_object))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock origin");
        let addr = listener.local_addr().expect("mock origin addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock origin server");
        });

        Self {
            base_url: format!("http://{}/bucket", addr),
            stats,
        }
    }

    pub fn hits(&self) -> usize {
        self.stats.hits.load(Ordering::SeqCst)
    }

    pub fn head_hits(&self) -> usize {
        self.stats.head_hits.load(Ordering::SeqCst)
    }
}

struct EndlessGuard(Arc<OriginStats>);

impl Drop for EndlessGuard {
    fn drop(&mut self) {
        self.0.endless_open.fetch_sub(1, Ordering::SeqCst);
        self.0.endless_dropped.fetch_add(1, Ordering::SeqCst);
    }
}

async fn serve_object(
    State(state): State<OriginState>,
    method: Method,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.stats.hits.fetch_add(1, Ordering::SeqCst);
    if method == Method::HEAD {
        state.stats.head_hits.fetch_add(1, Ordering::SeqCst);
    }
    let kind = key.split('/').next().unwrap_or_default();

    match kind {
        "unsatisfiable" => return StatusCode::RANGE_NOT_SATISFIABLE.into_response(),
        "broken" => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "empty-206" => return (StatusCode::PARTIAL_CONTENT, "abc").into_response(),
        "slow-headers" => tokio::time::sleep(SLOW_DELAY).await,
        "endless" => return endless(state.stats.clone()),
        "slow-body" => return slow_body(),
        _ => {}
    }

    let data = asset_bytes();
    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| resolve_range(v, data.len()));

    match range {
        Some((start, end)) if state.honor_ranges => Response::builder()
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", start, end, data.len()),
            )
            .header(header::CONTENT_LENGTH, end - start + 1)
            .body(Body::from(data[start..=end].to_vec()))
            .expect("partial response"),
        _ => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(header::CONTENT_LENGTH, data.len())
            .body(Body::from(data))
            .expect("full response"),
    }
}

fn endless(stats: Arc<OriginStats>) -> Response {
    stats.endless_open.fetch_add(1, Ordering::SeqCst);
    let guard = EndlessGuard(stats);
    let stream = futures::stream::unfold(guard, |guard| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Some((Ok::<_, std::io::Error>(Bytes::from_static(&[7u8; 8192])), guard))
    });
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .body(Body::from_stream(stream))
        .expect("endless response")
}

fn slow_body() -> Response {
    let data = asset_bytes();
    let half = data.len() / 2;
    let first = Bytes::from(data[..half].to_vec());
    let second = Bytes::from(data[half..].to_vec());
    let stream = futures::stream::unfold(0u8, move |step| {
        let (first, second) = (first.clone(), second.clone());
        async move {
            match step {
                0 => Some((Ok::<_, std::io::Error>(first), 1)),
                1 => {
                    tokio::time::sleep(SLOW_DELAY).await;
                    Some((Ok(second), 2))
                }
                _ => None,
            }
        }
    });
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from_stream(stream))
        .expect("slow response")
}

/// Inclusive byte span for a single-range header, clamped to `len`.
fn resolve_range(value: &str, len: usize) -> Option<(usize, usize)> {
    let spec = value.strip_prefix("bytes=")?;
    let (start, end) = spec.split_once('-')?;
    match (start.is_empty(), end.is_empty()) {
        (true, false) => {
            let suffix: usize = end.parse().ok()?;
            Some((len.saturating_sub(suffix), len - 1))
        }
        (false, _) => {
            let start: usize = start.parse().ok()?;
            let end = if end.is_empty() {
                len - 1
            } else {
                end.parse::<usize>().ok()?.min(len - 1)
            };
            (start <= end).then_some((start, end))
        }
        _ => None,
    }
}
