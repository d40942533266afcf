//! Caller authentication
//!
//! The stream handler asks an [`Authenticator`] who is calling. Any failure is
//! treated as "no identity"; only the access guard decides whether that matters.

mod session;

pub use session::{SessionAuthenticator, SessionClaims};

use async_trait::async_trait;
use axum::http::HeaderMap;
use vistream_core::models::Identity;
use vistream_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("User lookup failed: {0}")]
    Lookup(#[from] AppError),
}

/// Resolves request headers to an identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Ok(None)` when the request carries no credential at all.
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Identity>, AuthError>;
}
