//! Secure password hashing and verification using Argon2id.
//!
//! The hashing and verification methods are designed for use in HTTP
//! handlers and return handler-compatible errors: `hash_password` fails
//! with `ErrorKind::InternalServerError` for system failures, while
//! `verify_password` fails with `ErrorKind::InvalidCredentials` for
//! mismatches and `ErrorKind::InternalServerError` for system errors.

use argon2::password_hash::Error as ArgonError;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};

use crate::handler::{ErrorKind, Result};
use crate::{Error as ServiceError, Result as ServiceResult};

/// Target identifier for password hashing service logging and error reporting.
const TRACING_TARGET: &str = "notabene_server::security::hasher";

/// Secure password hashing and verification service using Argon2id.
///
/// # Security Features
///
/// - Uses the Argon2id variant (hybrid of Argon2i and Argon2d)
/// - OWASP recommended parameters (19 MB memory, 2 iterations, 1 thread)
/// - Cryptographically secure random salt generation
/// - Timing-safe password verification
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new password hashing service with OWASP recommended configuration.
    ///
    /// # Errors
    ///
    /// Returns a service error if Argon2 initialization fails.
    pub fn new() -> ServiceResult<Self> {
        let params = Params::new(
            19456, // 19 MB - OWASP recommended
            2,     // 2 iterations - OWASP recommended
            1,     // 1 thread - OWASP recommended
            None,  // Use default output length (32 bytes)
        )
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to create Argon2 parameters"
            );

            ServiceError::config("invalid password hashing configuration")
        })?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Ok(Self { argon2 })
    }

    /// Hashes a password using Argon2id with a cryptographically secure random salt.
    ///
    /// The returned PHC string includes the algorithm, parameters, salt, and
    /// hash value, making it suitable for long-term storage in a database.
    /// Each call generates a unique salt, so hashing the same password twice
    /// produces different strings that both verify.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InternalServerError` if salt generation or the
    /// hashing operation fails. The password itself is never logged.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes())
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing operation failed"
                );

                ErrorKind::InternalServerError
                    .with_message("Password processing failed")
                    .with_context("Hash generation error")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// Verification is timing-safe and does not leak why it failed.
    ///
    /// # Errors
    ///
    /// - `ErrorKind::InvalidCredentials` for incorrect passwords
    /// - `ErrorKind::InternalServerError` for invalid hash format or system errors
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "invalid password hash format provided"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication system temporarily unavailable")
                .with_context("Hash format error")
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::PasswordInvalid) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "password verification failed, incorrect password provided"
                );

                Err(ErrorKind::InvalidCredentials.into_error())
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification system error"
                );

                Err(ErrorKind::InternalServerError
                    .with_message("Authentication system temporarily unavailable")
                    .with_context("Verification error"))
            }
        }
    }

    /// Performs a dummy password verification to maintain consistent timing.
    ///
    /// Used when an account doesn't exist: generates a random password,
    /// hashes it, and verifies against it (which always fails), so the
    /// unknown-email path takes about as long as a real verification and
    /// account existence does not leak through response timing.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        use rand::RngExt;

        let password_len = rand::random_range(16..32);
        let dummy_password: String = (0..password_len)
            .map(|_| rand::rng().sample(rand::distr::Alphanumeric) as char)
            .collect();

        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let password = "secure_password_123";
        let hash = hasher.hash_password(password)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash).is_ok());
        assert!(hasher.verify_password("wrong_password", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let password = "test_password";

        let hash1 = hasher.hash_password(password)?;
        let hash2 = hasher.hash_password(password)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password(password, &hash1).is_ok());
        assert!(hasher.verify_password(password, &hash2).is_ok());

        Ok(())
    }

    #[test]
    fn verify_password_rejects_wrong_password_with_credential_error() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let hash = hasher.hash_password("correct_password")?;

        let result = hasher.verify_password("wrong_password", &hash);
        let error = result.expect_err("wrong password must not verify");
        assert_eq!(error.kind(), ErrorKind::InvalidCredentials);

        Ok(())
    }

    #[test]
    fn verify_password_rejects_malformed_hash_without_panicking() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;

        let result = hasher.verify_password("test_password", "not_a_valid_hash_format");
        let error = result.expect_err("malformed hash must not verify");
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        Ok(())
    }

    #[test]
    fn dummy_verification_always_fails() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        assert!(!hasher.verify_dummy_password("any_password"));
        Ok(())
    }
}
