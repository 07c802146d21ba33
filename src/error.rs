use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    /// Bad login credentials, a verification code mismatch, or a missing
    /// or unusable access token.
    AuthenticationFailed(String),
    WrongPassword,
    TokenExpired,
    /// Mail delivery failed; nothing was stored.
    Mail(String),
    NotFound(String),
    BadRequest(String),
    RateLimited(String),
    Internal(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::AuthenticationFailed(msg) => write!(f, "Authentication failed: {msg}"),
            AppError::WrongPassword => write!(f, "Wrong password"),
            AppError::TokenExpired => write!(f, "Refresh token expired"),
            AppError::Mail(msg) => write!(f, "Mail Error: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::AuthenticationFailed(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::WrongPassword => (StatusCode::UNAUTHORIZED, "Wrong password".to_string()),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Refresh token expired. Please log in again.".to_string(),
            ),
            AppError::Mail(msg) => {
                tracing::error!("Mail delivery failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Email could not be delivered".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}
