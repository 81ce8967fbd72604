use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// `null` on the wire when the client never supplied an age.
    #[serde(default)]
    pub age: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: u64, name: &str, email: &str, age: Option<i64>) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            email: normalize_email(email),
            age,
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Overlays a patch onto the record, field by field. Only name, email
    /// and age are client-writable; id, active and createdAt never change
    /// here. Stamps updatedAt.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = normalize_email(&email);
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
        self.updated_at = Some(Utc::now());
    }
}

/// The client-writable subset of a user record.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl UserPatch {
    /// Picks the known fields out of an already-validated payload.
    /// Anything else in the payload is dropped on the floor.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            name: payload.get("name").and_then(Value::as_str).map(str::to_owned),
            email: payload
                .get("email")
                .and_then(Value::as_str)
                .map(str::to_owned),
            age: payload.get("age").and_then(Value::as_i64),
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Next free id: one past the maximum, 1 for an empty collection.
pub fn next_id(users: &[User]) -> u64 {
    users.iter().map(|u| u.id).max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_user_is_normalized_and_active() {
        let user = User::new(1, "  Ana Ruiz ", " ANA@Example.com", None);
        assert_eq!(user.name, "Ana Ruiz");
        assert_eq!(user.email, "ana@example.com");
        assert!(user.active);
        assert!(user.age.is_none());
        assert!(user.updated_at.is_none());
    }

    #[test]
    fn next_id_starts_at_one_and_follows_the_max() {
        assert_eq!(next_id(&[]), 1);

        let users = vec![
            User::new(1, "Ana", "ana@example.com", None),
            User::new(7, "Bo", "bo@example.com", Some(30)),
        ];
        assert_eq!(next_id(&users), 8);
    }

    #[test]
    fn apply_overlays_only_supplied_fields() {
        let mut user = User::new(3, "Ana", "ana@example.com", Some(30));
        let created = user.created_at;

        user.apply(UserPatch::from_payload(&json!({ "age": 31, "id": 99 })));

        assert_eq!(user.id, 3);
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.age, Some(31));
        assert_eq!(user.created_at, created);
        assert!(user.updated_at.is_some());
    }

    #[test]
    fn apply_renormalizes_name_and_email() {
        let mut user = User::new(1, "Ana", "ana@example.com", None);
        user.apply(UserPatch::from_payload(
            &json!({ "name": " Bo ", "email": "BO@Example.com" }),
        ));
        assert_eq!(user.name, "Bo");
        assert_eq!(user.email, "bo@example.com");
    }

    #[test]
    fn wire_format_uses_camel_case_and_hides_updated_at_until_set() {
        let user = User::new(1, "Ana", "ana@example.com", None);
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_none());
        assert_eq!(value.get("age"), Some(&Value::Null));
    }
}
