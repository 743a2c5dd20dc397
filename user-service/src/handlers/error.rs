//! API error types for the user endpoints
//!
//! Every failure is rendered as `{"message": <operation message>, "error":
//! <detail>}` with status 500, except a missing user, which is a bare
//! `{"message": "user not found"}` with status 404.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::AuthorizationError;
use crate::models::MessageResponse;
use crate::repository::RepositoryError;

/// Detail reported for every rejected credential
pub const TOKEN_REJECTED: &str = "token is wrong";

/// Message of the 404 body
pub const USER_NOT_FOUND: &str = "user not found";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Creating a user
    Create,
    /// Listing a page of users
    List,
    /// Getting a single user by ID
    Get,
    /// Overwriting a user
    Update,
    /// Deleting a user (hard delete)
    Delete,
}

impl ApiOperation {
    /// The `message` field of an error response for this operation
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Create => "error creating user",
            Self::List => "error getting users",
            Self::Get => "error getting user",
            Self::Update => "error updating user",
            Self::Delete => "error deleting user",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Required payload fields are missing
    Validation,
    /// The user does not exist
    NotFound,
    /// The persistence backend rejected or failed the operation
    Persistence,
    /// The bearer token was missing or wrong
    Authorization,
    /// Body, query or field types could not be parsed
    BadRequest,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Persistence => write!(f, "persistence"),
            Self::Authorization => write!(f, "authorization"),
            Self::BadRequest => write!(f, "bad_request"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    ///
    /// Only `NotFound` gets its own status; authorization failures share
    /// 500 with everything else.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation | Self::Persistence | Self::Authorization | Self::BadRequest => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Text reported in the `error` field
    pub detail: String,
}

impl ApiError {
    /// Create a new API error
    ///
    /// Only the first line of `detail` is kept.
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, detail: impl AsRef<str>) -> Self {
        Self {
            operation,
            kind,
            detail: first_line(detail.as_ref()).to_string(),
        }
    }

    /// Missing required fields, `detail` is the joined message list
    pub fn validation(operation: ApiOperation, detail: impl AsRef<str>) -> Self {
        Self::new(operation, ApiErrorKind::Validation, detail)
    }

    /// The addressed user does not exist
    pub fn not_found(operation: ApiOperation) -> Self {
        Self::new(operation, ApiErrorKind::NotFound, USER_NOT_FOUND)
    }

    /// Malformed body, query string or field value
    pub fn bad_request(operation: ApiOperation, detail: impl AsRef<str>) -> Self {
        Self::new(operation, ApiErrorKind::BadRequest, detail)
    }

    /// Credential check failed; the reason is logged, never returned
    pub fn authorization(operation: ApiOperation, reason: &AuthorizationError) -> Self {
        tracing::warn!(%operation, %reason, "Rejected credentials");
        Self::new(operation, ApiErrorKind::Authorization, TOKEN_REJECTED)
    }

    /// Wrap a repository failure for `operation`
    pub fn persistence(operation: ApiOperation, err: RepositoryError) -> Self {
        Self::new(operation, ApiErrorKind::Persistence, err.message)
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.detail
        )
    }
}

impl std::error::Error for ApiError {}

/// `{message, error}` body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if self.kind == ApiErrorKind::NotFound {
            return (status, Json(MessageResponse::new(USER_NOT_FOUND))).into_response();
        }

        tracing::error!(
            operation = %self.operation,
            kind = %self.kind,
            "{}",
            self.detail
        );

        let body = ErrorResponse {
            message: self.operation.failure_message().to_string(),
            error: self.detail,
        };
        (status, Json(body)).into_response()
    }
}
