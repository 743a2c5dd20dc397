//! # user-service
//!
//! HTTP CRUD service for a single user resource, backed by PostgreSQL.
//!
//! ## Features
//!
//! - **REST endpoints**: create, paginated list, get, update and delete under `/user`
//! - **Field validation**: missing-field messages reported together
//! - **Guarded delete**: bearer token checked by an injected [`middleware::CredentialVerifier`]
//! - **Persistence**: PostgreSQL via sqlx, or an in-memory store when no database is configured
//! - **Middleware stack**: request tracking, panic recovery, body size limits, timeouts, CORS
//! - **Health checks**: `/test`, liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use user_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder()
//!         .config(config.clone())
//!         .build()
//!         .await?;
//!
//!     Server::new(config).serve(router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod server;
pub mod state;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AuthConfig, Config, DatabaseConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{router, ApiError, ApiErrorKind, ApiOperation};
    pub use crate::health::{health, readiness, test_route};
    pub use crate::middleware::{CredentialVerifier, SharedSecretVerifier};
    pub use crate::models::{NewUser, User, UserChanges, UserFields};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::repository::{
        InMemoryUserRepository, Pagination, PgUserRepository, RepositoryError, UserRepository,
    };
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
}
