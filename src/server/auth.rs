// Standard library
use std::net::SocketAddr;
use std::sync::Arc;

// 3rd party crates
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

// Project imports
use crate::settings::types::Mtls;

// Current module imports
use super::constants::FORBIDDEN_MESSAGE;
use super::types::{AccessDecision, AccessPolicy, PeerIdentity};

impl AccessPolicy {
    pub fn from_settings(mtls: &Mtls) -> Self {
        Self {
            mtls_enabled: mtls.enabled,
            allowed_cn: mtls.allowed_cn.clone(),
        }
    }

    /// Decides whether a request with the given client identity may scrape.
    ///
    /// Requests without a verified client certificate are always allowed; the
    /// TLS layer already rejects unverified clients when mTLS is enabled.
    pub fn decide(&self, identity: Option<&PeerIdentity>) -> AccessDecision {
        let Some(identity) = identity else {
            return AccessDecision::Unrestricted;
        };

        let common_name: &str = identity.common_name.as_deref().unwrap_or_default();
        if self.allowed_cn.iter().any(|allowed| allowed == common_name) {
            AccessDecision::Listed(common_name.to_string())
        } else if self.allowed_cn.is_empty() || !self.mtls_enabled {
            AccessDecision::Unrestricted
        } else {
            AccessDecision::Denied(common_name.to_string())
        }
    }
}

/// Middleware rejecting clients whose certificate common name is not allowed.
pub async fn require_allowed_cn(
    State(policy): State<Arc<AccessPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let remote: String = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match policy.decide(request.extensions().get::<PeerIdentity>()) {
        AccessDecision::Listed(common_name) => {
            info!(cn = %common_name, remote = %remote, "Authentication successful");
            next.run(request).await
        }
        AccessDecision::Unrestricted => {
            info!(remote = %remote, "Request allowed without client certificate check");
            next.run(request).await
        }
        AccessDecision::Denied(common_name) => {
            warn!(
                cn = %common_name,
                remote = %remote,
                "Authentication failed - incorrect CN"
            );
            forbidden()
        }
    }
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": FORBIDDEN_MESSAGE })),
    )
        .into_response()
}
