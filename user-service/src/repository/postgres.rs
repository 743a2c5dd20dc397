//! PostgreSQL implementation of [`UserRepository`]

use async_trait::async_trait;
use sqlx::PgPool;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{Pagination, RepositoryResult, UserRepository};
use crate::models::{NewUser, User, UserChanges};

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, avatar, created_at, updated_at, deleted_at";

/// `users` table access over a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn tagged(operation: RepositoryOperation) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |err| RepositoryError::from(err).with_operation(operation)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let sql = format!(
            "INSERT INTO users (email, first_name, last_name, avatar, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );

        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.avatar)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(tagged(RepositoryOperation::Create))?;

        tracing::debug!(id = created.id, "Inserted user");
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(tagged(RepositoryOperation::FindById))
    }

    async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");

        sqlx::query_as::<_, User>(&sql)
            .bind(pagination.limit)
            .bind(pagination.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(tagged(RepositoryOperation::FindPage))
    }

    async fn count(&self) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(tagged(RepositoryOperation::Count))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> RepositoryResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET email = $1, first_name = $2, last_name = $3, avatar = $4, \
             updated_at = $5 WHERE id = $6 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&changes.email)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.avatar)
            .bind(changes.updated_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(tagged(RepositoryOperation::Update))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(tagged(RepositoryOperation::Delete))?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(tagged(RepositoryOperation::Ping))?;
        Ok(())
    }
}
