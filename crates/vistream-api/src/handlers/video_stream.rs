use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method},
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use vistream_core::models::{caller_label, AccessDecision, ByteRange, Identity, StreamRequest};
use vistream_core::{AppError, PlaybackStarted};

use crate::stream::guard::record_decision;
use crate::stream::{parse_video_id, relay};

/// `GET /api/video/stream/{id}` (and `HEAD`)
///
/// Streams a video through the proxy, honoring a single `Range` when the
/// origin supports it. `HEAD` is forwarded as `HEAD` and never counts as playback.
#[tracing::instrument(skip_all, fields(video_id = %raw_id))]
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    method: Method,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let start = Instant::now();
    let video_id = parse_video_id(&raw_id)?;

    let asset = match state.locator.locate(video_id).await {
        Ok(asset) => asset,
        Err(e @ AppError::NotFound(_)) => {
            record_decision(video_id, None, AccessDecision::DenyNotFound);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let policy = state.guard.snapshot().await;
    let caller = if policy.bypass_auth {
        Some(Identity::dev_bypass())
    } else if policy.require_auth_for_unpublished {
        authenticate(&state, &headers).await
    } else {
        None
    };

    match state.guard.authorize(&asset, caller.as_ref(), &policy) {
        AccessDecision::Allow => {}
        AccessDecision::DenyUnauthenticated => {
            return Err(AppError::Unauthorized {
                message: state.stream.auth_required_message.clone(),
            }
            .into());
        }
        AccessDecision::DenyNotFound => {
            return Err(AppError::NotFound(format!("video {}", video_id)).into());
        }
    }

    let request = StreamRequest {
        video_id,
        range: requested_range(&headers),
        caller,
    };

    let origin = state
        .origin
        .fetch(&method, &asset.storage_key, request.range.as_ref())
        .await?;
    let origin_status = origin.status;

    let response = relay(origin, &asset, &method, state.stream.cache_max_age_secs)?;

    if method == Method::GET && request.is_playback_start() {
        state.events.publish(PlaybackStarted {
            video_id,
            caller: request.caller.as_ref().map(|c| c.open_id.clone()),
        });
    }

    tracing::info!(
        video_id = video_id,
        method = %method,
        caller = %caller_label(request.caller.as_ref()),
        range = ?request.range.as_ref().map(|r| r.header_value()),
        origin_status = origin_status,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Stream established"
    );

    Ok(response)
}

/// Authentication failures degrade to anonymous.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    match state.authenticator.authenticate(headers).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(error = %e, "Authentication failed, continuing as anonymous");
            None
        }
    }
}

/// Single byte range from the request, if it is one we can forward.
fn requested_range(headers: &HeaderMap) -> Option<ByteRange> {
    let raw = headers.get(header::RANGE)?;
    let parsed = raw.to_str().ok().and_then(ByteRange::parse);
    if parsed.is_none() {
        tracing::debug!(range = ?raw, "Ignoring unsupported Range header, serving full body");
    }
    parsed
}
