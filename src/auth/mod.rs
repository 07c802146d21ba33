pub mod authenticator;
pub mod extractor;
pub mod jwt;
pub mod password;

use async_trait::async_trait;
use axum_extra::extract::cookie::Cookie;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub auto_login: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub auto_login: bool,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Fails with `AuthenticationFailed` on an unknown email or wrong password.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AppError>;
}

pub trait TokenProvider: Send + Sync {
    fn generate_login_token(&self, identity: &Identity, auto_login: bool)
    -> Result<TokenPair, AppError>;

    /// Cookie carrying the refresh token. The auto-login flag decides
    /// whether it outlives the browser session.
    fn generate_refresh_cookie(&self, refresh_token: &str, auto_login: bool) -> Cookie<'static>;
}

/// Reads claims out of a signed token without enforcing expiry.
pub trait TokenResolver: Send + Sync {
    fn get_authentication(&self, token: &str) -> Result<Identity, AppError>;
    fn get_auto_login(&self, token: &str) -> Result<bool, AppError>;
}

pub trait TokenValidator: Send + Sync {
    /// True only for a well-signed, unexpired refresh token.
    fn validate_token(&self, token: &str) -> bool;
}

pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> Result<String, AppError>;
    fn matches(&self, raw: &str, hash: &str) -> Result<bool, AppError>;
}
