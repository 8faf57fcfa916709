//! Bearer token gate for the MCP session endpoint

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const MISSING_HEADER_MESSAGE: &str = "Unauthorized: Missing Authorization header";
pub const INVALID_FORMAT_MESSAGE: &str =
    "Unauthorized: Invalid Authorization header format (Expected 'Bearer <token>')";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden: Invalid Bearer token";

/// Outcome of checking one request against the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// No token configured; everything passes
    Open,
    /// Path is not protected
    Bypass,
    /// Token matched
    Authorized,
    MissingHeader,
    InvalidFormat,
    Forbidden,
}

impl GateDecision {
    /// Status and plain-text body for a rejected request
    pub fn rejection(&self) -> Option<(StatusCode, &'static str)> {
        match self {
            GateDecision::MissingHeader => Some((StatusCode::UNAUTHORIZED, MISSING_HEADER_MESSAGE)),
            GateDecision::InvalidFormat => Some((StatusCode::UNAUTHORIZED, INVALID_FORMAT_MESSAGE)),
            GateDecision::Forbidden => Some((StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE)),
            _ => None,
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    if a_bytes.len() != b_bytes.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a_bytes.iter().zip(b_bytes) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Shared-secret check in front of a single protected path
#[derive(Clone)]
pub struct AccessGate {
    token: Option<Arc<str>>,
    protected_path: Arc<str>,
}

impl AccessGate {
    /// Gate `protected_path` with `token`. An absent or empty token disables
    /// the check entirely.
    pub fn new(token: Option<String>, protected_path: impl Into<String>) -> Self {
        let protected_path: String = protected_path.into();
        Self {
            token: token.filter(|t| !t.is_empty()).map(Arc::from),
            protected_path: Arc::from(protected_path),
        }
    }

    pub fn is_enforcing(&self) -> bool {
        self.token.is_some()
    }

    pub fn protected_path(&self) -> &str {
        &self.protected_path
    }

    pub fn check(&self, path: &str, authorization: Option<&HeaderValue>) -> GateDecision {
        let Some(expected) = self.token.as_deref() else {
            return GateDecision::Open;
        };

        if path != self.protected_path.as_ref() {
            return GateDecision::Bypass;
        }

        let Some(value) = authorization else {
            return GateDecision::MissingHeader;
        };
        let Ok(value) = value.to_str() else {
            return GateDecision::InvalidFormat;
        };

        let mut parts = value.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                if constant_time_eq(token, expected) {
                    GateDecision::Authorized
                } else {
                    GateDecision::Forbidden
                }
            }
            _ => GateDecision::InvalidFormat,
        }
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("enforcing", &self.is_enforcing())
            .field("protected_path", &self.protected_path)
            .finish()
    }
}

/// Middleware applying an [`AccessGate`] to every request
pub async fn bearer_gate(State(gate): State<AccessGate>, request: Request, next: Next) -> Response {
    let decision = gate.check(
        request.uri().path(),
        request.headers().get(header::AUTHORIZATION),
    );

    if let Some((status, message)) = decision.rejection() {
        tracing::warn!(
            path = %request.uri().path(),
            status = status.as_u16(),
            "Rejected unauthenticated request"
        );
        return (status, message).into_response();
    }

    if decision == GateDecision::Open {
        tracing::warn!("MCP_SERVER_AUTH_TOKEN not set. Skipping auth check.");
    }

    next.run(request).await
}
