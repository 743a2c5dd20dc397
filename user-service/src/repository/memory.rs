//! In-process implementation of [`UserRepository`]
//!
//! Used when no database is configured and throughout the test suite. It
//! enforces the same constraints the `users` table declares (unique email,
//! column widths) so both backends fail the same requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{Pagination, RepositoryResult, UserRepository};
use crate::models::user::{AVATAR_MAX_LEN, EMAIL_MAX_LEN, NAME_MAX_LEN};
use crate::models::{NewUser, User, UserChanges};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, User>,
    last_id: i32,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|row| row.email == email && Some(row.id) != except)
    }
}

/// Thread-safe in-memory user table
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_widths(
    operation: RepositoryOperation,
    email: &str,
    first_name: &str,
    last_name: &str,
    avatar: &str,
) -> RepositoryResult<()> {
    let columns = [
        (email, EMAIL_MAX_LEN),
        (first_name, NAME_MAX_LEN),
        (last_name, NAME_MAX_LEN),
        (avatar, AVATAR_MAX_LEN),
    ];

    match columns
        .iter()
        .find(|(value, max)| value.chars().count() > *max)
    {
        Some((_, max)) => Err(RepositoryError::constraint_violation(
            operation,
            format!("value too long for type character varying({max})"),
        )),
        None => Ok(()),
    }
}

fn duplicate_email(operation: RepositoryOperation) -> RepositoryError {
    RepositoryError::constraint_violation(
        operation,
        "duplicate key value violates unique constraint \"users_email_key\"",
    )
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let operation = RepositoryOperation::Create;
        check_widths(
            operation,
            &user.email,
            &user.first_name,
            &user.last_name,
            &user.avatar,
        )?;

        let mut table = self.table.write().await;
        if table.email_taken(&user.email, None) {
            return Err(duplicate_email(operation));
        }

        table.last_id += 1;
        let row = User {
            id: table.last_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar: user.avatar,
            created_at: Some(user.created_at),
            updated_at: None,
            deleted_at: None,
        };
        table.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<User>> {
        let offset = usize::try_from(pagination.offset).map_err(|_| {
            RepositoryError::database_error(
                RepositoryOperation::FindPage,
                "OFFSET must not be negative",
            )
        })?;
        let limit = usize::try_from(pagination.limit).map_err(|_| {
            RepositoryError::database_error(
                RepositoryOperation::FindPage,
                "LIMIT must not be negative",
            )
        })?;

        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let len = self.table.read().await.rows.len();
        i64::try_from(len).map_err(|e| {
            RepositoryError::database_error(RepositoryOperation::Count, e.to_string())
        })
    }

    async fn update(&self, id: i32, changes: UserChanges) -> RepositoryResult<Option<User>> {
        let operation = RepositoryOperation::Update;
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }

        check_widths(
            operation,
            &changes.email,
            &changes.first_name,
            &changes.last_name,
            &changes.avatar,
        )?;
        if table.email_taken(&changes.email, Some(id)) {
            return Err(duplicate_email(operation));
        }

        Ok(table.rows.get_mut(&id).map(|row| {
            row.email = changes.email;
            row.first_name = changes.first_name;
            row.last_name = changes.last_name;
            row.avatar = changes.avatar;
            row.updated_at = Some(changes.updated_at);
            row.clone()
        }))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;
    use chrono::Utc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            avatar: "ada.png".to_string(),
            created_at: Utc::now(),
        }
    }

    fn changes(email: &str) -> UserChanges {
        UserChanges {
            email: email.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            avatar: "grace.png".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_not_reused() {
        let repo = InMemoryUserRepository::new();
        let first = repo.create(new_user("a@example.com")).await.unwrap();
        let second = repo.create(new_user("b@example.com")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        assert!(repo.delete(second.id).await.unwrap());
        let third = repo.create(new_user("c@example.com")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com")).await.unwrap();

        let err = repo.create(new_user("a@example.com")).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
        assert!(err.message.contains("users_email_key"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_column_width_is_enforced() {
        let repo = InMemoryUserRepository::new();
        let mut user = new_user("a@example.com");
        user.avatar = "x".repeat(AVATAR_MAX_LEN + 1);

        let err = repo.create(user).await.unwrap_err();
        assert_eq!(
            err.message,
            "value too long for type character varying(80)"
        );
    }

    #[tokio::test]
    async fn test_find_page_orders_by_id() {
        let repo = InMemoryUserRepository::new();
        for n in 1..=5 {
            repo.create(new_user(&format!("{n}@example.com")))
                .await
                .unwrap();
        }

        let page = repo.find_page(Pagination::new(2, 2)).await.unwrap();
        let ids: Vec<i32> = page.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let tail = repo.find_page(Pagination::new(4, 10)).await.unwrap();
        assert_eq!(tail.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_own_email_and_rejects_others() {
        let repo = InMemoryUserRepository::new();
        let ada = repo.create(new_user("a@example.com")).await.unwrap();
        repo.create(new_user("b@example.com")).await.unwrap();

        let updated = repo
            .update(ada.id, changes("a@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.created_at, ada.created_at);
        assert!(updated.updated_at.is_some());

        let err = repo
            .update(ada.id, changes("b@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_none() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.update(42, changes("x@example.com")).await.unwrap().is_none());
        assert!(!repo.delete(42).await.unwrap());
    }
}
