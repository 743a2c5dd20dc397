//! Bearer token extraction and shared-secret verification
//!
//! The delete endpoint is the only guarded route. Its credential check goes
//! through [`CredentialVerifier`] so the secret lives in configuration and
//! tests can swap the verifier out.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

/// Why a request failed authorization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// No `Authorization` header
    #[error("Missing Authorization header")]
    MissingHeader,

    /// Header present but not `Bearer <token>`
    #[error("Invalid Authorization header format")]
    MalformedHeader,

    /// Token does not match the configured secret
    #[error("Token rejected")]
    InvalidToken,
}

/// Checks a presented bearer token
pub trait CredentialVerifier: Send + Sync {
    /// Accept or reject `token`
    fn verify(&self, token: &str) -> Result<(), AuthorizationError>;
}

/// Accepts exactly one configured token
///
/// Built without a secret it rejects everything.
#[derive(Clone, Default)]
pub struct SharedSecretVerifier {
    secret: Option<String>,
}

impl SharedSecretVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Whether a secret is configured at all
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

impl std::fmt::Debug for SharedSecretVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretVerifier")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialVerifier for SharedSecretVerifier {
    fn verify(&self, token: &str) -> Result<(), AuthorizationError> {
        match self.secret.as_deref() {
            Some(secret) if constant_time_eq(secret.as_bytes(), token.as_bytes()) => Ok(()),
            _ => Err(AuthorizationError::InvalidToken),
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extract token from Authorization header (Bearer scheme)
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthorizationError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthorizationError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthorizationError::MalformedHeader)?;

    let mut parts = auth_header.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthorizationError::MalformedHeader),
    }
}

/// Extract the bearer token and run it through `verifier`
pub fn authorize(
    headers: &HeaderMap,
    verifier: &dyn CredentialVerifier,
) -> Result<(), AuthorizationError> {
    let token = extract_token(headers)?;
    verifier.verify(token)
}
