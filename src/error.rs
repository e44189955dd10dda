use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decryption error: {0}")]
    Crypto(String),

    #[error("No result available")]
    NoResult,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) | AppError::Crypto(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NoResult => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Store(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
