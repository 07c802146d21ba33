use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::REFRESH_COOKIE;
use crate::auth::{Credentials, TokenPair};
use crate::error::AppError;
use crate::routes::{MessageResponse, normalize_email};
use crate::state::SharedState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(mut req): Json<Credentials>,
) -> Result<(CookieJar, Json<TokenPair>), AppError> {
    req.email = normalize_email(&req.email);

    if state.login_limiter.check(&req.email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let tokens = match state.login.login(&req).await {
        Ok(tokens) => tokens,
        Err(AppError::AuthenticationFailed(msg)) => {
            state.login_limiter.record(&req.email);
            return Err(AppError::AuthenticationFailed(msg));
        }
        Err(e) => return Err(e),
    };

    let cookie = state.login.generate_refresh_cookie(&tokens)?;
    Ok((CookieJar::new().add(cookie), Json(tokens)))
}

pub async fn reissue(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenPair>), AppError> {
    let refresh = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::AuthenticationFailed("Missing refresh token".to_string()))?;

    let tokens = state.login.reissue_token(&refresh)?;
    let cookie = state.login.generate_refresh_cookie(&tokens)?;

    Ok((CookieJar::new().add(cookie), Json(tokens)))
}

pub async fn password_check(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(req): Json<PasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .login
        .password_check(auth.identity(), &req.password)
        .await?;

    Ok(Json(MessageResponse::new("Password confirmed")))
}

pub async fn change_password(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(req): Json<PasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    state
        .login
        .change_password(auth.identity(), &req.password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed")))
}

pub async fn find_password(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.login.find_password(auth.identity()).await?;

    Ok(Json(MessageResponse::new(
        "A temporary password has been sent to your email",
    )))
}
