use std::sync::Arc;

use rand::Rng;
use subtle::ConstantTimeEq;

use crate::cache::CodeCache;
use crate::email::MailTransport;
use crate::email::templates;
use crate::error::AppError;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const CODE_LEN: usize = 6;
pub const TEMPORARY_PASSWORD_LEN: usize = 10;

/// Six decimal digits, zero-padded.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:0width$}", rng.random_range(0..1_000_000u32), width = CODE_LEN)
}

/// Ten characters drawn uniformly from all 62 alphanumerics.
pub fn generate_temporary_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TEMPORARY_PASSWORD_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Issues one-time codes and temporary passwords by email and checks
/// submitted codes against the latest one issued.
pub struct EmailManager {
    mailer: Arc<dyn MailTransport>,
    cache: Arc<dyn CodeCache>,
    from: String,
}

impl EmailManager {
    pub fn new(mailer: Arc<dyn MailTransport>, cache: Arc<dyn CodeCache>, from: String) -> Self {
        Self {
            mailer,
            cache,
            from,
        }
    }

    pub async fn issue_signup_code(&self, email: &str) -> Result<String, AppError> {
        let code = generate_code(&mut rand::rng());
        let content = templates::render_signup_code(&code);

        self.mailer
            .send(&self.from, email, templates::SIGNUP_SUBJECT, &content)
            .await?;
        self.cache.set(email, &code).await?;

        tracing::info!("Signup code issued for {email}");
        Ok(code)
    }

    pub async fn issue_temporary_password(&self, email: &str) -> Result<String, AppError> {
        let password = generate_temporary_password(&mut rand::rng());
        self.send_temporary_password(email, &password).await?;
        Ok(password)
    }

    /// Mail an already generated temporary password and cache it.
    pub async fn send_temporary_password(&self, email: &str, password: &str) -> Result<(), AppError> {
        let content = templates::render_temporary_password(password);

        self.mailer
            .send(&self.from, email, templates::TEMPORARY_PASSWORD_SUBJECT, &content)
            .await?;
        self.cache.set(email, password).await?;

        tracing::info!("Temporary password issued for {email}");
        Ok(())
    }

    /// Missing, expired and mismatched codes are indistinguishable to the caller.
    pub async fn verify_code(&self, email: &str, submitted: &str) -> Result<(), AppError> {
        let stored = self.cache.get(email).await?;

        let matches = stored
            .map(|code| bool::from(code.as_bytes().ct_eq(submitted.as_bytes())))
            .unwrap_or(false);

        if !matches {
            tracing::debug!("Verification code rejected for {email}");
            return Err(AppError::AuthenticationFailed(
                "Authentication failed".to_string(),
            ));
        }

        Ok(())
    }
}
