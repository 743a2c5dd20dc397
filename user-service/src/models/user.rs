use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Column width of `users.email`
pub const EMAIL_MAX_LEN: usize = 120;
/// Column width of `users.first_name` and `users.last_name`
pub const NAME_MAX_LEN: usize = 80;
/// Column width of `users.avatar`
pub const AVATAR_MAX_LEN: usize = 80;

/// Persisted user record
///
/// `deleted_at` is part of the table but no operation writes it; deletes
/// remove the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The four client-supplied fields shared by create and update payloads
///
/// Unknown keys in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserFields {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

impl UserFields {
    /// Extract the fields from a submitted JSON payload
    pub fn from_payload(payload: &Value) -> serde_json::Result<Self> {
        Self::deserialize(payload)
    }
}

/// Insert data for a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Build a new user stamped with the given creation time
    pub fn new(fields: UserFields, created_at: DateTime<Utc>) -> Self {
        Self {
            email: fields.email,
            first_name: fields.first_name,
            last_name: fields.last_name,
            avatar: fields.avatar,
            created_at,
        }
    }
}

/// Overwrite data for an existing user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub updated_at: DateTime<Utc>,
}

impl UserChanges {
    /// Build a change set stamped with the given update time
    pub fn new(fields: UserFields, updated_at: DateTime<Utc>) -> Self {
        Self {
            email: fields.email,
            first_name: fields.first_name,
            last_name: fields.last_name,
            avatar: fields.avatar,
            updated_at,
        }
    }
}

/// `{message}` body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{message, data}` body returned by create and update
///
/// `data` is the payload exactly as the client submitted it.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
    pub data: Value,
}

/// `{user}` body returned by get-by-id
#[derive(Debug, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub user: User,
}

/// Paginated list body
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub page: i64,
    pub per_page: i64,
    pub total_page: i64,
    pub total: i64,
    pub data: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_ignore_unknown_keys() {
        let payload = json!({
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "avatar": "https://example.com/ada.png",
            "username": "ada"
        });

        let fields = UserFields::from_payload(&payload).unwrap();
        assert_eq!(fields.email, "ada@example.com");
        assert_eq!(fields.last_name, "Lovelace");
    }

    #[test]
    fn test_fields_reject_null_value() {
        let payload = json!({
            "email": null,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "avatar": "ada.png"
        });

        let err = UserFields::from_payload(&payload).unwrap_err();
        assert!(err.to_string().contains("invalid type: null"));
    }

    #[test]
    fn test_user_serializes_null_timestamps() {
        let user = User {
            id: 1,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            avatar: "ada.png".to_string(),
            created_at: Some(Utc::now()),
            updated_at: None,
            deleted_at: None,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], 1);
        assert!(value["created_at"].is_string());
        assert!(value["updated_at"].is_null());
        assert!(value["deleted_at"].is_null());
    }
}
