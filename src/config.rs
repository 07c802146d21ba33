use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub mail_from: String,
    pub code_ttl: Duration,
    pub tokens: TokenLifetimes,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

/// How long each kind of token stays valid.
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: chrono::Duration,
    /// Refresh lifetime for a plain (session) login.
    pub refresh: chrono::Duration,
    /// Refresh lifetime when the user asked to stay signed in.
    pub auto_login_refresh: chrono::Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: chrono::Duration::minutes(30),
            refresh: chrono::Duration::hours(24),
            auto_login_refresh: chrono::Duration::days(14),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("DATAPORTAL_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid DATAPORTAL_HOST: {e}"))?;

        let port: u16 = env_or("DATAPORTAL_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid DATAPORTAL_PORT: {e}"))?;

        let log_level = env_or("DATAPORTAL_LOG_LEVEL", "info");
        let mail_from = env_or("DATAPORTAL_MAIL_FROM", "no-reply@localhost");

        let code_ttl_secs: u64 = env_or("DATAPORTAL_CODE_TTL_SECS", "300")
            .parse()
            .map_err(|e| format!("Invalid DATAPORTAL_CODE_TTL_SECS: {e}"))?;

        let access = env_lifetime("DATAPORTAL_ACCESS_TTL_MINS", "30", chrono::Duration::try_minutes)?;
        let refresh = env_lifetime("DATAPORTAL_REFRESH_TTL_HOURS", "24", chrono::Duration::try_hours)?;
        let auto_login_refresh =
            env_lifetime("DATAPORTAL_AUTO_LOGIN_TTL_DAYS", "14", chrono::Duration::try_days)?;

        let smtp = match (
            std::env::var("DATAPORTAL_SMTP_HOST").ok(),
            std::env::var("DATAPORTAL_SMTP_PORT").ok(),
            std::env::var("DATAPORTAL_SMTP_USER").ok(),
            std::env::var("DATAPORTAL_SMTP_PASS").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid DATAPORTAL_SMTP_PORT: {e}"))?,
                user,
                pass,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            log_level,
            mail_from,
            code_ttl: Duration::from_secs(code_ttl_secs),
            tokens: TokenLifetimes {
                access,
                refresh,
                auto_login_refresh,
            },
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_lifetime(
    key: &str,
    default: &str,
    unit: fn(i64) -> Option<chrono::Duration>,
) -> Result<chrono::Duration, String> {
    parse_lifetime(key, &env_or(key, default), unit)
}

/// A strictly positive count of `unit`s whose expiry, counted from now, is
/// still a representable date.
fn parse_lifetime(
    key: &str,
    raw: &str,
    unit: fn(i64) -> Option<chrono::Duration>,
) -> Result<chrono::Duration, String> {
    let count: i64 = raw.parse().map_err(|e| format!("Invalid {key}: {e}"))?;
    if count <= 0 {
        return Err(format!("Invalid {key}: must be greater than zero"));
    }
    unit(count)
        .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| format!("Invalid {key}: {count} is out of range"))
}
