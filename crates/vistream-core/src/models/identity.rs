use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub open_id: String,
    pub name: Option<String>,
    pub role: UserRole,
}

impl Identity {
    /// Privileged identity used while the development bypass is on.
    pub fn dev_bypass() -> Self {
        Self {
            user_id: 1,
            open_id: "dev-user".to_string(),
            name: Some("Development User".to_string()),
            role: UserRole::Admin,
        }
    }
}

/// Caller label for log records: the open id, or `anonymous`.
pub fn caller_label(identity: Option<&Identity>) -> &str {
    identity.map(|i| i.open_id.as_str()).unwrap_or("anonymous")
}
