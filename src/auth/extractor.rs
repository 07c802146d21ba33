use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::Identity;
use crate::error::AppError;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "access_token";

/// The caller's identity, taken from a live access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header.to_str().map_err(|_| {
                AppError::AuthenticationFailed("Invalid authorization header".to_string())
            })?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return state.tokens.decode_access(token).map(AuthUser);
            }
        }

        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(ACCESS_COOKIE) {
            return state.tokens.decode_access(cookie.value()).map(AuthUser);
        }

        Err(AppError::AuthenticationFailed(
            "Missing authentication token".to_string(),
        ))
    }
}
