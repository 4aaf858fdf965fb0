use argon2::{
    Algorithm, Argon2, Params, PasswordHasher, Version,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::error::{AppError, AppResult};

/// Argon2id hashing with a random salt per call.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordService {
    pub fn new(params: Params) -> AppResult<Self> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, "storefront-unknown-account")?;
        Ok(Self { argon2, dummy_hash })
    }

    /// Library default cost (19 MiB, 2 passes).
    pub fn with_default_params() -> AppResult<Self> {
        Self::new(Params::default())
    }

    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        hash_with(&self.argon2, plaintext)
    }

    /// Verification parameters are taken from the digest itself; argon2
    /// compares the output in constant time.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spend one verification on a throwaway digest. Used when the account
    /// does not exist so the response time does not reveal it.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }
}

fn hash_with(argon2: &Argon2<'static>, plaintext: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}
