//! Origin Fetcher: signed GET against the storage backend.
//!
//! Only the wait for response headers is bounded. Once the origin has answered,
//! the body may take as long as the client takes to read it.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE};
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use vistream_core::models::ByteRange;
use vistream_core::AppError;
use vistream_storage::Storage;

/// Body bytes as they arrive from the origin.
pub type OriginBody = BoxStream<'static, Result<Bytes, std::io::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Origin honored the range (206)
    Partial,
    /// Whole object, either unranged or the origin ignored `Range`
    Full,
}

/// Response descriptor handed to the relay. Owns the origin connection via `body`.
pub struct OriginResponse {
    pub kind: ResponseKind,
    pub status: u16,
    pub content_range: Option<String>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub body: OriginBody,
}

impl std::fmt::Debug for OriginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginResponse")
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("content_range", &self.content_range)
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl OriginResponse {
    /// Classify an origin answer.
    ///
    /// - 206 must carry `Content-Range`, otherwise the response is unusable.
    /// - Any other 2xx is served as the full object, even if a range was asked for.
    /// - Everything else, and a missing body, is an origin error.
    pub fn classify(
        status: StatusCode,
        headers: &HeaderMap,
        range_requested: bool,
        body: Option<OriginBody>,
    ) -> Result<Self, AppError> {
        let code = status.as_u16();

        let kind = if status == StatusCode::PARTIAL_CONTENT {
            ResponseKind::Partial
        } else if status.is_success() {
            ResponseKind::Full
        } else {
            return Err(AppError::origin(
                Some(code),
                format!("origin answered {}", status),
            ));
        };

        let content_range = header_string(headers, CONTENT_RANGE);
        if kind == ResponseKind::Partial && content_range.is_none() {
            return Err(AppError::origin(
                Some(code),
                "partial response without Content-Range",
            ));
        }

        let Some(body) = body else {
            return Err(AppError::origin(Some(code), "origin returned no body"));
        };

        if kind == ResponseKind::Full && range_requested {
            tracing::debug!(origin_status = code, "Origin ignored Range, serving full body");
        }

        Ok(Self {
            kind,
            status: code,
            content_range: match kind {
                ResponseKind::Partial => content_range,
                ResponseKind::Full => None,
            },
            content_length: header_string(headers, CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            content_type: header_string(headers, CONTENT_TYPE),
            body,
        })
    }
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy)]
pub struct OriginOptions {
    pub signed_url_ttl: Duration,
    pub connect_timeout: Duration,
    /// Bound on the wait for response headers, not on the body transfer.
    pub response_timeout: Duration,
}

#[derive(Clone)]
pub struct OriginFetcher {
    client: reqwest::Client,
    storage: Arc<dyn Storage>,
    options: OriginOptions,
}

impl OriginFetcher {
    pub fn new(storage: Arc<dyn Storage>, options: OriginOptions) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build origin client: {}", e)))?;

        Ok(Self {
            client,
            storage,
            options,
        })
    }

    /// Sign `storage_key` for `method`, forward `range` unchanged, and wait for headers.
    ///
    /// `HEAD` stays `HEAD` so no body transfer is opened at the origin.
    pub async fn fetch(
        &self,
        method: &Method,
        storage_key: &str,
        range: Option<&ByteRange>,
    ) -> Result<OriginResponse, AppError> {
        let start = Instant::now();

        let url = self
            .storage
            .get_presigned_url(method, storage_key, self.options.signed_url_ttl)
            .await
            .map_err(|e| AppError::Signing(e.to_string()))?;

        let mut request = self.client.request(method.clone(), url);
        if let Some(range) = range {
            request = request.header(RANGE, range.header_value());
        }

        let response = match tokio::time::timeout(self.options.response_timeout, request.send()).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                let status = e.status().map(|s| s.as_u16());
                return Err(AppError::origin(
                    status,
                    format!("origin request failed: {}", e.without_url()),
                ));
            }
            Err(_) => {
                return Err(AppError::origin(
                    None,
                    format!(
                        "origin did not answer within {}s",
                        self.options.response_timeout.as_secs_f64()
                    ),
                ));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();

        tracing::debug!(
            origin_status = status.as_u16(),
            method = %method,
            range = ?range.map(|r| r.header_value()),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Origin responded"
        );

        let body: OriginBody = response
            .bytes_stream()
            .map_err(|e| std::io::Error::other(e.without_url()))
            .boxed();

        OriginResponse::classify(status, &headers, range.is_some(), Some(body))
    }
}
