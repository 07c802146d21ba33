use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::authenticator::StoreAuthenticator;
use crate::auth::jwt::JwtTokens;
use crate::auth::password::Argon2Encoder;
use crate::cache::MemoryCodeCache;
use crate::config::Config;
use crate::db::{MemoryUserStore, PgUserStore, UserStore};
use crate::email::{EmailManager, LogMailer, MailTransport, SmtpMailer};
use crate::rate_limit::AttemptLimiter;
use crate::services::LoginService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub codes: Arc<MemoryCodeCache>,
    pub tokens: Arc<JwtTokens>,
    pub emails: Arc<EmailManager>,
    pub login: LoginService,
    pub login_limiter: AttemptLimiter,
    pub code_limiter: AttemptLimiter,
    pub verify_limiter: AttemptLimiter,
}

impl AppState {
    /// Wire every collaborator from configuration. `pool` selects the
    /// Postgres user store; without one, users live in memory.
    pub fn from_config(config: Config, pool: Option<PgPool>) -> Result<Self, String> {
        let users: Arc<dyn UserStore> = match pool {
            Some(pool) => Arc::new(PgUserStore::new(pool)),
            None => {
                tracing::warn!("No database configured, using in-memory user store");
                Arc::new(MemoryUserStore::new())
            }
        };

        let mailer: Arc<dyn MailTransport> = match config.smtp.as_ref() {
            Some(smtp) => {
                let mailer = SmtpMailer::new(smtp)?;
                tracing::info!("SMTP configured");
                Arc::new(mailer)
            }
            None => {
                tracing::warn!("SMTP not configured, emails will only be logged");
                Arc::new(LogMailer)
            }
        };

        Self::assemble(config, users, mailer)
    }

    /// Wire the services around an explicit user store and mail transport.
    pub fn assemble(
        config: Config,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn MailTransport>,
    ) -> Result<Self, String> {
        let codes = Arc::new(MemoryCodeCache::new(config.code_ttl));
        let tokens = Arc::new(JwtTokens::new(&config.jwt_secret, config.tokens));
        let encoder = Arc::new(Argon2Encoder::new()?);
        let emails = Arc::new(EmailManager::new(
            mailer,
            codes.clone(),
            config.mail_from.clone(),
        ));

        let login = LoginService::new(
            Arc::new(StoreAuthenticator::new(users.clone(), encoder.clone())),
            tokens.clone(),
            tokens.clone(),
            tokens.clone(),
            users.clone(),
            emails.clone(),
            encoder,
        );

        Ok(Self {
            config,
            users,
            codes,
            tokens,
            emails,
            login,
            login_limiter: AttemptLimiter::per_quarter_hour(),
            code_limiter: AttemptLimiter::per_quarter_hour(),
            verify_limiter: AttemptLimiter::per_quarter_hour(),
        })
    }
}
