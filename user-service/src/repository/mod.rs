//! Persistence layer for the user resource
//!
//! - [`UserRepository`]: the contract handlers depend on
//! - [`PgUserRepository`]: PostgreSQL backend (sqlx)
//! - [`InMemoryUserRepository`]: process-local backend for tests and
//!   database-less runs

mod error;
mod memory;
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
pub use traits::{Pagination, RepositoryResult, UserRepository};
