use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

impl UsersClientError {
    /// Maps a non-success response onto the error taxonomy the server
    /// speaks: a 404 with a message, a 400 with an `errors` list, or any
    /// other status with a `message`.
    pub(crate) async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            let joined = errors
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            return Self::Validation(joined);
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();

        if status == StatusCode::NOT_FOUND {
            Self::NotFound(message)
        } else {
            Self::Api { status, message }
        }
    }
}
