pub mod auth;
pub mod email;

use axum::Router;
use axum::routing::{post, put};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Emails are matched case-insensitively everywhere: stores, code cache and
/// limiters all see the trimmed, lowercased form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Email verification
        .route("/api/v1/auth/email", post(email::send_code))
        .route("/api/v1/auth/email/verify", post(email::verify_code))
        // Session
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/reissue", post(auth::reissue))
        // Password
        .route("/api/v1/auth/password", put(auth::change_password))
        .route("/api/v1/auth/password/check", post(auth::password_check))
        .route("/api/v1/auth/password/temporary", post(auth::find_password))
}
