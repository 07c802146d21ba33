use std::sync::LazyLock;

use axum::Json;
use axum::extract::State;
use regex::Regex;
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::{MessageResponse, normalize_email};
use crate::state::SharedState;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub async fn send_code(
    State(state): State<SharedState>,
    Json(req): Json<SendCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if state.code_limiter.check(&email).is_err() {
        return Err(AppError::RateLimited(
            "Too many verification emails. Please try again later.".to_string(),
        ));
    }
    state.code_limiter.record(&email);

    state.emails.issue_signup_code(&email).await?;

    Ok(Json(MessageResponse::new("Verification code sent")))
}

pub async fn verify_code(
    State(state): State<SharedState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = normalize_email(&req.email);

    // Counted per email, so a new code does not reset the guesses left.
    if state.verify_limiter.check(&email).is_err() {
        return Err(AppError::RateLimited(
            "Too many verification attempts. Please try again later.".to_string(),
        ));
    }

    if let Err(e) = state.emails.verify_code(&email, &req.code).await {
        if matches!(e, AppError::AuthenticationFailed(_)) {
            state.verify_limiter.record(&email);
        }
        return Err(e);
    }

    Ok(Json(MessageResponse::new("Email verified")))
}
