use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User with ID {0} not found")]
    UserNotFound(u64),
    #[error("email already registered")]
    EmailTaken,
    #[error("email already registered by another user")]
    EmailTakenByOther,
    #[error("validation failed")]
    Validation(Vec<String>),
    /// Request body was not parseable as JSON; carries the parser message.
    #[error("could not process request")]
    BadPayload(String),
    /// The store refused a write during create/update. Reported with the
    /// same 400 shape as BadPayload; see DESIGN.md for the status-code
    /// policy around persistence failures.
    #[error("could not process request")]
    SaveFailed(&'static str),
    #[error("could not delete user")]
    DeleteFailed,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DeleteFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::EmailTaken
            | ApiError::EmailTakenByOther
            | ApiError::Validation(_)
            | ApiError::BadPayload(_)
            | ApiError::SaveFailed(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => json!({
                "success": false,
                "errors": errors,
            }),
            ApiError::BadPayload(detail) => json!({
                "success": false,
                "message": self.to_string(),
                "error": detail,
            }),
            ApiError::SaveFailed(detail) => json!({
                "success": false,
                "message": self.to_string(),
                "error": detail,
            }),
            _ => json!({
                "success": false,
                "message": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
