use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::auth::PasswordEncoder;
use crate::error::AppError;

/// Argon2id with 19MB memory, 2 iterations, parallelism 1.
pub struct Argon2Encoder {
    params: Params,
}

impl Argon2Encoder {
    pub fn new() -> Result<Self, String> {
        let params = Params::new(19 * 1024, 2, 1, None).map_err(|e| format!("Invalid params: {e}"))?;
        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordEncoder for Argon2Encoder {
    fn encode(&self, raw: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher()
            .hash_password(raw.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Hashing failed: {e}")))
    }

    fn matches(&self, raw: &str, hash: &str) -> Result<bool, AppError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
        // Parameters are read back from the PHC string.
        Ok(Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok())
    }
}
