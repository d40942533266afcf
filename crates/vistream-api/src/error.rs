//! HTTP error response conversion
//!
//! Every failure that happens before the first body byte is rendered here.
//! Handlers return `Result<Response, HttpAppError>` and use `?` on anything
//! that converts into `AppError`.
//!
//! Bodies only ever carry the client message from [`ErrorMetadata`]; error
//! chains, storage keys and signed URLs stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use vistream_core::{AppError, ErrorMetadata, LogLevel};
use vistream_storage::StorageError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether retrying the same request may succeed
    pub recoverable: bool,
    /// Localized explanation, present on authentication failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "requiresAuth", skip_serializing_if = "Option::is_none")]
    pub requires_auth: Option<bool>,
}

impl ErrorResponse {
    pub fn from_app_error(error: &AppError) -> Self {
        match error {
            AppError::Unauthorized { .. } => Self {
                error: "Unauthorized".to_string(),
                code: error.error_code().to_string(),
                recoverable: error.is_recoverable(),
                message: Some(error.client_message()),
                requires_auth: Some(true),
            },
            _ => Self {
                error: error.client_message(),
                code: error.error_code().to_string(),
                recoverable: error.is_recoverable(),
                message: None,
                requires_auth: None,
            },
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError are both foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::Signing(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let status = error.http_status_code();
    let origin_status = error.origin_status();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, status = status, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(
                error = %error,
                error_type = error_type,
                status = status,
                origin_status = ?origin_status,
                "Request failed"
            );
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                status = status,
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(ErrorResponse::from_app_error(app_error))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = HttpAppError(error).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_identifier_contract() {
        let (status, body) = render(AppError::InvalidIdentifier("abc".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid video id");
        assert!(body.get("requiresAuth").is_none());
    }

    #[tokio::test]
    async fn test_not_found_contract() {
        let (status, body) = render(AppError::NotFound("video 12".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "video not found");
    }

    #[tokio::test]
    async fn test_unauthorized_contract() {
        let (status, body) = render(AppError::Unauthorized {
            message: "login required".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["message"], "login required");
        assert_eq!(body["requiresAuth"], true);
    }

    #[tokio::test]
    async fn test_origin_error_hides_backend_detail() {
        let (status, body) = render(AppError::origin(
            Some(503),
            "GET http://minio:9000/videos/private/key.mp4 failed",
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "failed to stream video");
        assert_eq!(body["recoverable"], true);
        assert!(!body.to_string().contains("minio"));
        assert!(!body.to_string().contains("key.mp4"));
    }

    #[tokio::test]
    async fn test_storage_error_maps_to_500() {
        let response =
            HttpAppError::from(StorageError::SigningFailed("no credentials".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
