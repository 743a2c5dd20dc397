//! Persistence contract for the user resource
//!
//! Handlers talk to storage only through [`UserRepository`], which is held as
//! a trait object in [`crate::state::AppState`]. Every mutating call is its
//! own committed unit of work: when `create`, `update` or `delete` returns
//! `Ok`, the change is durable.

use async_trait::async_trait;

use super::error::RepositoryError;
use crate::models::{NewUser, User, UserChanges};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// A window into the id-ordered user table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of rows to skip
    pub offset: i64,
    /// Maximum number of rows to return
    pub limit: i64,
}

impl Pagination {
    /// Create new pagination parameters
    pub const fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }
}

/// CRUD operations over the `users` table
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the stored row with its assigned id
    ///
    /// A duplicate email or an over-long column fails with
    /// [`RepositoryErrorKind::ConstraintViolation`](super::RepositoryErrorKind::ConstraintViolation).
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;

    /// Find a user by id, `Ok(None)` when absent
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;

    /// Users ordered by id ascending within the given window
    async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<User>>;

    /// Total number of users
    async fn count(&self) -> RepositoryResult<i64>;

    /// Overwrite the mutable columns of an existing user
    ///
    /// Returns `Ok(None)` when no user has the given id.
    async fn update(&self, id: i32, changes: UserChanges) -> RepositoryResult<Option<User>>;

    /// Remove a user permanently
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    async fn delete(&self, id: i32) -> RepositoryResult<bool>;

    /// Check the backend is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}
