//! HTTP handlers and routing
//!
//! | Method | Path                      | Handler                 |
//! |--------|---------------------------|-------------------------|
//! | GET    | `/test`                   | [`health::test_route`]  |
//! | GET    | `/health`                 | [`health::health`]      |
//! | GET    | `/ready`                  | [`health::readiness`]   |
//! | POST   | `/user`                   | [`create_user`]         |
//! | GET    | `/user?page=&per_page=`   | [`list_users`]          |
//! | GET    | `/user/{id}`              | [`get_user`]            |
//! | PUT    | `/user/{id}`              | [`update_user`]         |
//! | DELETE | `/user/{id}`              | [`delete_user`]         |
//!
//! [`health::test_route`]: crate::health::test_route
//! [`health::health`]: crate::health::health
//! [`health::readiness`]: crate::health::readiness

mod error;
mod users;

use axum::{routing::get, Router};

use crate::{health, state::AppState};

pub use error::{ApiError, ApiErrorKind, ApiOperation, ErrorResponse, TOKEN_REJECTED, USER_NOT_FOUND};
pub use users::{create_user, delete_user, get_user, list_users, update_user, ListParams};

/// Build the application router with all routes bound to `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/test", get(health::test_route))
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .route("/user", get(list_users).post(create_user))
        .route(
            "/user/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}
