use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;

use crate::auth::{
    Authenticator, Credentials, Identity, PasswordEncoder, TokenPair, TokenProvider,
    TokenResolver, TokenValidator,
};
use crate::db::UserStore;
use crate::email::EmailManager;
use crate::email::manager::generate_temporary_password;
use crate::error::AppError;
use crate::models::User;

/// Login, token reissue and password management for signed-in users.
pub struct LoginService {
    authenticator: Arc<dyn Authenticator>,
    provider: Arc<dyn TokenProvider>,
    resolver: Arc<dyn TokenResolver>,
    validator: Arc<dyn TokenValidator>,
    users: Arc<dyn UserStore>,
    emails: Arc<EmailManager>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl LoginService {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        provider: Arc<dyn TokenProvider>,
        resolver: Arc<dyn TokenResolver>,
        validator: Arc<dyn TokenValidator>,
        users: Arc<dyn UserStore>,
        emails: Arc<EmailManager>,
        encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            authenticator,
            provider,
            resolver,
            validator,
            users,
            emails,
            encoder,
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AppError> {
        let identity = self
            .authenticator
            .authenticate(&credentials.email, &credentials.password)
            .await?;

        tracing::info!(email = %identity.email, "User logged in");
        self.provider
            .generate_login_token(&identity, credentials.auto_login)
    }

    /// Mint a fresh pair from a refresh token. The token is validated before
    /// any claim is read from it.
    pub fn reissue_token(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        if !self.validator.validate_token(refresh_token) {
            return Err(AppError::TokenExpired);
        }

        let identity = self.resolver.get_authentication(refresh_token)?;
        let auto_login = self.resolver.get_auto_login(refresh_token)?;
        self.provider.generate_login_token(&identity, auto_login)
    }

    /// The auto-login flag is read from the access token of the pair.
    pub fn generate_refresh_cookie(&self, tokens: &TokenPair) -> Result<Cookie<'static>, AppError> {
        let auto_login = self.resolver.get_auto_login(&tokens.access_token)?;
        Ok(self
            .provider
            .generate_refresh_cookie(&tokens.refresh_token, auto_login))
    }

    pub async fn password_check(&self, identity: &Identity, password: &str) -> Result<(), AppError> {
        let user = self.find_user(identity).await?;

        if self.encoder.matches(password, &user.password_hash)? {
            return Ok(());
        }
        Err(AppError::WrongPassword)
    }

    pub async fn change_password(
        &self,
        identity: &Identity,
        new_password: &str,
    ) -> Result<(), AppError> {
        let mut user = self.find_user(identity).await?;
        let hash = self.encoder.encode(new_password)?;
        self.users.update_password(&mut user, hash).await?;

        tracing::info!(email = %user.email, "Password changed");
        Ok(())
    }

    /// Make a fresh temporary password the user's password, then mail it.
    /// Nothing is mailed unless the new hash is stored, and an undelivered
    /// password is rolled back to the previous hash.
    pub async fn find_password(&self, identity: &Identity) -> Result<(), AppError> {
        let mut user = self.find_user(identity).await?;
        let previous = user.password_hash.clone();
        let temporary = generate_temporary_password(&mut rand::rng());

        self.change_password(identity, &temporary).await?;

        if let Err(e) = self
            .emails
            .send_temporary_password(&user.email, &temporary)
            .await
        {
            tracing::warn!(email = %user.email, "Temporary password not delivered, restoring previous password");
            self.users.update_password(&mut user, previous).await?;
            return Err(e);
        }

        Ok(())
    }

    async fn find_user(&self, identity: &Identity) -> Result<User, AppError> {
        self.users
            .find_by_email(&identity.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
