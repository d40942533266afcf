//! Access Guard: may this caller stream this asset?

use std::sync::Arc;
use vistream_core::models::{caller_label, AccessDecision, AccessPolicy, Identity, VideoAsset};
use vistream_db::SettingsStore;

/// Target for access audit records.
pub const AUDIT_TARGET: &str = "vistream::audit";

/// Pure access rules, evaluated in order.
pub fn decide(asset: &VideoAsset, caller: Option<&Identity>, policy: &AccessPolicy) -> AccessDecision {
    if policy.bypass_auth || asset.published || !policy.require_auth_for_unpublished {
        return AccessDecision::Allow;
    }

    match caller {
        Some(_) => AccessDecision::Allow,
        None => AccessDecision::DenyUnauthenticated,
    }
}

/// Emit one audit record. Never fails.
pub fn record_decision(video_id: i64, caller: Option<&Identity>, decision: AccessDecision) {
    let caller = caller_label(caller);
    match decision {
        AccessDecision::Allow => {
            tracing::info!(target: AUDIT_TARGET, video_id = video_id, caller = %caller, decision = %decision, "Access decision");
        }
        AccessDecision::DenyUnauthenticated | AccessDecision::DenyNotFound => {
            tracing::warn!(target: AUDIT_TARGET, video_id = video_id, caller = %caller, decision = %decision, "Access decision");
        }
    }
}

#[derive(Clone)]
pub struct AccessGuard {
    settings: Arc<dyn SettingsStore>,
    require_auth_for_unpublished: bool,
    allow_bypass: bool,
}

impl AccessGuard {
    /// `allow_bypass` is false in production; the persisted bypass setting is then ignored.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        require_auth_for_unpublished: bool,
        allow_bypass: bool,
    ) -> Self {
        Self {
            settings,
            require_auth_for_unpublished,
            allow_bypass,
        }
    }

    /// Read the current flags. An unreadable bypass setting counts as off.
    pub async fn snapshot(&self) -> AccessPolicy {
        let requested = match self.settings.bypass_auth().await {
            Ok(bypass) => bypass,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read bypass setting, treating as disabled");
                false
            }
        };

        let bypass_auth = requested && self.allow_bypass;
        if requested && !self.allow_bypass {
            tracing::error!(
                target: AUDIT_TARGET,
                "Authentication bypass is set but not allowed in this environment; ignoring it"
            );
        } else if bypass_auth {
            tracing::warn!("Authentication bypass is active; every caller is treated as an administrator");
        }

        AccessPolicy {
            bypass_auth,
            require_auth_for_unpublished: self.require_auth_for_unpublished,
        }
    }

    pub fn authorize(
        &self,
        asset: &VideoAsset,
        caller: Option<&Identity>,
        policy: &AccessPolicy,
    ) -> AccessDecision {
        let decision = decide(asset, caller, policy);
        record_decision(asset.id, caller, decision);
        decision
    }
}
