use serde::Serialize;

use crate::domain::user::User;

#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    pub success: bool,
    pub total: usize,
    pub data: Vec<User>,
}

impl CollectionResponse {
    pub fn new(data: Vec<User>) -> Self {
        Self {
            success: true,
            total: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: User,
}

impl RecordResponse {
    pub fn new(data: User) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: &'static str, data: User) -> Self {
        Self {
            success: true,
            message: Some(message),
            data,
        }
    }
}
