//! Middleware for credential checks and request tracking

pub mod request_tracking;
pub mod token;

pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, SENSITIVE_HEADERS,
};
pub use token::{
    authorize, extract_token, AuthorizationError, CredentialVerifier, SharedSecretVerifier,
};
