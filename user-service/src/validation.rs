//! Required-field checks for user payloads
//!
//! Only key presence is checked. A key holding `null` counts as present;
//! types, formats and lengths are left to deserialization and the table
//! constraints.

use serde_json::Value;

/// Required payload keys and the message reported when each is absent
pub const REQUIRED_FIELDS: [(&str, &str); 4] = [
    ("email", "email is missing"),
    ("first_name", "first name is missing"),
    ("last_name", "last name is missing"),
    ("avatar", "avatar is missing"),
];

/// Return the missing-field messages for `payload`, joined with `", "`
///
/// Returns an empty string when every required key is present. A payload
/// that is not a JSON object is missing all of them.
pub fn missing_fields(payload: &Value) -> String {
    let object = payload.as_object();

    REQUIRED_FIELDS
        .iter()
        .filter(|(key, _)| !object.is_some_and(|map| map.contains_key(*key)))
        .map(|(_, message)| *message)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> Value {
        json!({
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "avatar": "ada.png"
        })
    }

    #[test]
    fn test_complete_payload_has_no_messages() {
        assert_eq!(missing_fields(&complete()), "");
    }

    #[test]
    fn test_each_single_missing_field_is_named() {
        for (key, message) in REQUIRED_FIELDS {
            let mut payload = complete();
            payload.as_object_mut().unwrap().remove(key);
            assert_eq!(missing_fields(&payload), message);
        }
    }

    #[test]
    fn test_messages_are_joined_in_order() {
        let payload = json!({ "first_name": "Ada", "avatar": "ada.png" });
        assert_eq!(
            missing_fields(&payload),
            "email is missing, last name is missing"
        );
    }

    #[test]
    fn test_null_counts_as_present() {
        let mut payload = complete();
        payload["email"] = Value::Null;
        assert_eq!(missing_fields(&payload), "");
    }

    #[test]
    fn test_non_object_payload_misses_everything() {
        assert_eq!(
            missing_fields(&json!(["email"])),
            "email is missing, first name is missing, last name is missing, avatar is missing"
        );
    }
}
