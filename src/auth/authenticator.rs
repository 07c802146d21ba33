use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{Authenticator, Identity, PasswordEncoder};
use crate::db::UserStore;
use crate::error::AppError;

/// Looks the user up by email and checks the password against the stored hash.
pub struct StoreAuthenticator {
    users: Arc<dyn UserStore>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl StoreAuthenticator {
    pub fn new(users: Arc<dyn UserStore>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { users, encoder }
    }
}

#[async_trait]
impl Authenticator for StoreAuthenticator {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::AuthenticationFailed("Invalid credentials".to_string()))?;

        if !self.encoder.matches(password, &user.password_hash)? {
            return Err(AppError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ));
        }

        Ok(Identity::new(user.email))
    }
}
