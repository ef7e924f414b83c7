//! Password hashing (Argon2id, random salt) and verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{AppError, AppResult};

/// Argon2id hasher with configurable cost. Verification reads the cost
/// parameters from the stored PHC string, so older hashes keep verifying
/// after the configured cost changes.
#[derive(Clone)]
pub struct Passwords {
    params: Params,
    /// Hash checked when no stored hash exists, so a lookup miss costs the
    /// same Argon2 work as a password mismatch.
    decoy_hash: String,
}

impl Passwords {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::Config(format!("argon2 params: {}", e)))?;
        let mut passwords = Self {
            params,
            decoy_hash: String::new(),
        };
        passwords.decoy_hash = passwords.hash("decoy-password-never-matches")?;
        Ok(passwords)
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, hash: &str, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Spend one verification on the decoy hash. Always `false`.
    pub fn verify_decoy(&self, password: &str) -> AppResult<bool> {
        self.verify(&self.decoy_hash, password)?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Passwords {
        Passwords::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_and_verify_password() {
        let passwords = cheap();
        let hash = passwords.hash("mypassword").unwrap();
        assert!(passwords.verify(&hash, "mypassword").unwrap());
        assert!(!passwords.verify(&hash, "wrong").unwrap());
    }

    #[test]
    fn hash_is_salted_and_not_plaintext() {
        let passwords = cheap();
        let a = passwords.hash("secret1").unwrap();
        let b = passwords.hash("secret1").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("secret1"));
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn verifies_hash_made_with_other_cost() {
        let old = Passwords::new(2048, 2, 1).unwrap();
        let hash = old.hash("secret1").unwrap();
        assert!(cheap().verify(&hash, "secret1").unwrap());
    }

    #[test]
    fn decoy_verification_never_matches() {
        let passwords = cheap();
        assert!(!passwords.verify_decoy("secret1").unwrap());
        assert!(!passwords.verify_decoy("decoy-password-never-matches").unwrap());
        assert!(passwords.decoy_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(cheap().verify("not-a-phc-string", "secret1").is_err());
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(Passwords::new(1024, 0, 1).is_err());
    }
}
