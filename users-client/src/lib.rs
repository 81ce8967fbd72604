use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod error;
mod http_client;

pub use error::UsersClientError;
pub use http_client::UsersClient;

/// A user record as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a user. An absent age is omitted from the JSON;
/// the server rejects an explicit `null`.
#[derive(Debug, Default, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

/// Partial update payload; only the supplied fields reach the wire.
#[derive(Debug, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}
