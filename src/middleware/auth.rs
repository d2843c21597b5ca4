use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared admin secret
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Outcome of checking a request against the shared secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// No secret provisioned on the server; writes fail closed
    Unconfigured,
    Unauthorized,
    Authorized,
}

/// Shared-secret gate for admin writes. Only the digest of the secret is kept.
#[derive(Clone)]
pub struct AdminGate {
    expected: Option<[u8; 32]>,
}

impl AdminGate {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            expected: secret.filter(|s| !s.is_empty()).map(digest),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    pub fn check(&self, presented: Option<&str>) -> GateDecision {
        let Some(expected) = self.expected else {
            return GateDecision::Unconfigured;
        };

        match presented {
            Some(token) if !token.is_empty() && digests_match(&expected, &digest(token)) => {
                GateDecision::Authorized
            }
            _ => GateDecision::Unauthorized,
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Rejects admin requests before any body parsing or storage access
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match state.gate.check(presented) {
        GateDecision::Authorized => Ok(next.run(request).await),
        GateDecision::Unconfigured => {
            tracing::error!("Admin write rejected: ADMIN_TOKEN is not configured");
            Err(ApiError::internal_server_error("ADMIN_TOKEN not set in environment."))
        }
        GateDecision::Unauthorized => {
            tracing::warn!("Admin write rejected: {} {}", request.method(), request.uri().path());
            Err(ApiError::unauthorized("Unauthorized."))
        }
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
