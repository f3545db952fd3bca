//! Session capability gate.
//!
//! Routes behind this gate only require that *some* valid session exists.
//! The token is verified and dropped; handlers never receive the identity.

use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

#[derive(Clone)]
pub struct SessionGate {
    key: Option<DecodingKey>,
}

impl SessionGate {
    /// Gate that verifies HS256 bearer tokens signed with `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            key: Some(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    /// Gate that lets every request through (local development).
    pub fn disabled() -> Self {
        Self { key: None }
    }

    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(s) if !s.is_empty() => Self::new(s),
            _ => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Check that the headers carry a valid session token.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let Some(key) = &self.key else {
            return Ok(());
        };

        let token = bearer_token(headers)
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing bearer token")))?;

        jsonwebtoken::decode::<serde_json::Value>(token, key, &Validation::new(Algorithm::HS256))
            .map(|_| ())
            .map_err(|e| AppError::Unauthorized(anyhow::anyhow!("Invalid session: {}", e)))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Reject requests without a valid session before they reach a handler.
pub async fn require_session(
    State(gate): State<SessionGate>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate.check(req.headers()).inspect_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Session check failed");
    })?;
    Ok(next.run(req).await)
}
