use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::auth::{Identity, TokenPair, TokenProvider, TokenResolver, TokenValidator};
use crate::config::TokenLifetimes;
use crate::error::AppError;

pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub auto: bool,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        identity: &Identity,
        auto_login: bool,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<Self, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal(format!("Token lifetime {ttl} overflows")))?;

        Ok(Self {
            sub: identity.email.clone(),
            auto: auto_login,
            typ: kind,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }
}

/// HS256 token issuer and reader. One instance serves as provider, resolver
/// and validator.
pub struct JwtTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetimes: TokenLifetimes,
}

impl JwtTokens {
    pub fn new(secret: &str, lifetimes: TokenLifetimes) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetimes,
        }
    }

    fn refresh_ttl(&self, auto_login: bool) -> Duration {
        if auto_login {
            self.lifetimes.auto_login_refresh
        } else {
            self.lifetimes.refresh
        }
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("JWT encode failed: {e}")))
    }

    fn decode_claims(&self, token: &str, check_expiry: bool) -> Result<Claims, String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("JWT decode failed: {e}"))
    }

    /// Identity for a live access token. Refresh tokens are rejected.
    pub fn decode_access(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self.decode_claims(token, true).map_err(|e| {
            tracing::debug!("Rejected access token: {e}");
            AppError::AuthenticationFailed("Invalid or expired token".to_string())
        })?;

        if claims.typ != TokenKind::Access {
            return Err(AppError::AuthenticationFailed(
                "Invalid or expired token".to_string(),
            ));
        }

        Ok(Identity::new(claims.sub))
    }
}

impl TokenProvider for JwtTokens {
    fn generate_login_token(
        &self,
        identity: &Identity,
        auto_login: bool,
    ) -> Result<TokenPair, AppError> {
        let access = Claims::new(identity, auto_login, TokenKind::Access, self.lifetimes.access)?;
        let refresh = Claims::new(
            identity,
            auto_login,
            TokenKind::Refresh,
            self.refresh_ttl(auto_login),
        )?;

        Ok(TokenPair {
            access_token: self.encode_claims(&access)?,
            refresh_token: self.encode_claims(&refresh)?,
            auto_login,
        })
    }

    fn generate_refresh_cookie(&self, refresh_token: &str, auto_login: bool) -> Cookie<'static> {
        let builder = Cookie::build((REFRESH_COOKIE, refresh_token.to_string()))
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Strict);

        // Without auto-login the cookie dies with the browser session.
        if auto_login {
            let ttl = self.refresh_ttl(true);
            builder
                .max_age(time::Duration::seconds(ttl.num_seconds()))
                .build()
        } else {
            builder.build()
        }
    }
}

impl TokenResolver for JwtTokens {
    fn get_authentication(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self
            .decode_claims(token, false)
            .map_err(|_| AppError::AuthenticationFailed("Malformed token".to_string()))?;
        Ok(Identity::new(claims.sub))
    }

    fn get_auto_login(&self, token: &str) -> Result<bool, AppError> {
        let claims = self
            .decode_claims(token, false)
            .map_err(|_| AppError::AuthenticationFailed("Malformed token".to_string()))?;
        Ok(claims.auto)
    }
}

impl TokenValidator for JwtTokens {
    fn validate_token(&self, token: &str) -> bool {
        match self.decode_claims(token, true) {
            Ok(claims) => claims.typ == TokenKind::Refresh,
            Err(e) => {
                tracing::debug!("Refresh token failed validation: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-that-is-long-enough";

    fn tokens() -> JwtTokens {
        JwtTokens::new(SECRET, TokenLifetimes::default())
    }

    #[test]
    fn login_pair_carries_identity_and_flag() {
        let tokens = tokens();
        let pair = tokens
            .generate_login_token(&Identity::new("a@x.com"), true)
            .unwrap();

        assert!(pair.auto_login);
        assert_eq!(
            tokens.get_authentication(&pair.refresh_token).unwrap(),
            Identity::new("a@x.com")
        );
        assert!(tokens.get_auto_login(&pair.access_token).unwrap());
        assert!(tokens.get_auto_login(&pair.refresh_token).unwrap());
        assert_eq!(
            tokens.decode_access(&pair.access_token).unwrap(),
            Identity::new("a@x.com")
        );
    }

    #[test]
    fn validator_accepts_refresh_but_not_access_tokens() {
        let tokens = tokens();
        let pair = tokens
            .generate_login_token(&Identity::new("a@x.com"), false)
            .unwrap();

        assert!(tokens.validate_token(&pair.refresh_token));
        assert!(!tokens.validate_token(&pair.access_token));
        assert!(tokens.decode_access(&pair.refresh_token).is_err());
    }

    #[test]
    fn expired_refresh_token_fails_validation_but_still_resolves() {
        let expired = JwtTokens::new(
            SECRET,
            TokenLifetimes {
                refresh: Duration::seconds(-120),
                ..TokenLifetimes::default()
            },
        );
        let pair = expired
            .generate_login_token(&Identity::new("a@x.com"), false)
            .unwrap();

        assert!(!expired.validate_token(&pair.refresh_token));
        assert_eq!(
            expired.get_authentication(&pair.refresh_token).unwrap().email,
            "a@x.com"
        );
    }

    #[test]
    fn overflowing_lifetime_is_an_error_not_a_panic() {
        let tokens = JwtTokens::new(
            SECRET,
            TokenLifetimes {
                auto_login_refresh: Duration::days(100_000_000),
                ..TokenLifetimes::default()
            },
        );

        let err = tokens
            .generate_login_token(&Identity::new("a@x.com"), true)
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        // Plain logins use the other lifetime and still work.
        assert!(
            tokens
                .generate_login_token(&Identity::new("a@x.com"), false)
                .is_ok()
        );
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let other = JwtTokens::new("some-other-secret", TokenLifetimes::default());
        let pair = other
            .generate_login_token(&Identity::new("a@x.com"), false)
            .unwrap();

        let tokens = tokens();
        assert!(!tokens.validate_token(&pair.refresh_token));
        assert!(tokens.get_authentication(&pair.refresh_token).is_err());
        assert!(!tokens.validate_token("garbage"));
    }

    #[test]
    fn refresh_cookie_persists_only_with_auto_login() {
        let tokens = tokens();

        let persistent = tokens.generate_refresh_cookie("r", true);
        assert_eq!(persistent.name(), REFRESH_COOKIE);
        assert_eq!(persistent.value(), "r");
        assert_eq!(persistent.http_only(), Some(true));
        assert_eq!(persistent.max_age(), Some(time::Duration::days(14)));

        let session = tokens.generate_refresh_cookie("r", false);
        assert_eq!(session.max_age(), None);
    }
}
