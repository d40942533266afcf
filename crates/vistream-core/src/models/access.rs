use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Outcome of the access check for one request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    DenyUnauthenticated,
    DenyNotFound,
}

impl AccessDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::DenyUnauthenticated => "deny_unauthenticated",
            AccessDecision::DenyNotFound => "deny_not_found",
        }
    }
}

impl Display for AccessDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Per-request snapshot of the process-wide access flags.
///
/// `bypass_auth` comes from persisted settings and is development-only.
/// `require_auth_for_unpublished` comes from `ENABLE_VIDEO_AUTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub bypass_auth: bool,
    pub require_auth_for_unpublished: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            bypass_auth: false,
            require_auth_for_unpublished: true,
        }
    }
}
