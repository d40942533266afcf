//! HS256 session cookie verification

use super::{AuthError, Authenticator};
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vistream_core::models::Identity;
use vistream_db::UserStore;

/// Claims carried by the session cookie issued at OAuth login.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "openId")]
    pub open_id: String,
    #[serde(rename = "appId", default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
}

/// Verifies the session cookie and resolves its subject through the user store.
pub struct SessionAuthenticator {
    cookie_name: String,
    decoding_key: DecodingKey,
    validation: Validation,
    users: Arc<dyn UserStore>,
}

impl SessionAuthenticator {
    pub fn new(cookie_name: impl Into<String>, secret: &str, users: Arc<dyn UserStore>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp".to_string()].into_iter().collect();

        Self {
            cookie_name: cookie_name.into(),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            users,
        }
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AuthError::InvalidToken("session has expired".to_string())
                    }
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        if token_data.claims.open_id.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty openId".to_string()));
        }

        Ok(token_data.claims)
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Identity>, AuthError> {
        let Some(token) = find_cookie(headers, &self.cookie_name) else {
            return Ok(None);
        };

        let claims = self.verify(&token)?;
        let identity = self.users.find_by_open_id(&claims.open_id).await?;

        if identity.is_none() {
            tracing::debug!(open_id = %claims.open_id, "Session subject has no user record");
        }

        Ok(identity)
    }
}

/// First cookie named `name` across all `Cookie` headers.
fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
