//! Session token signing keys and token issuance/validation.
//!
//! This module provides [`SessionKeys`], the signing-secret holder for
//! JWT-based sessions. Tokens carry the account id as the canonical decimal
//! string in the `sub` claim together with issued-at and expiry instants;
//! validation re-parses the subject back to its numeric form.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::Args;
use jiff::Timestamp;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Target identifier for session key logging and error reporting.
const TRACING_TARGET: &str = "notabene_server::security::session_keys";

/// Session token configuration: signing secret, algorithm, and lifetime.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SessionKeysConfig {
    /// Secret used to sign and verify session tokens.
    #[cfg_attr(feature = "config", arg(long = "auth-secret", env = "AUTH_SECRET"))]
    pub auth_secret: String,

    /// HMAC signing algorithm name (HS256, HS384, or HS512).
    #[cfg_attr(
        feature = "config",
        arg(long = "auth-algorithm", env = "AUTH_ALGORITHM", default_value = "HS256")
    )]
    #[serde(default = "SessionKeysConfig::default_algorithm")]
    pub auth_algorithm: String,

    /// Session token lifetime in minutes.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "auth-token-ttl-minutes",
            env = "AUTH_TOKEN_TTL_MINUTES",
            default_value = "30"
        )
    )]
    #[serde(default = "SessionKeysConfig::default_token_ttl_minutes")]
    pub auth_token_ttl_minutes: i64,
}

impl SessionKeysConfig {
    fn default_algorithm() -> String {
        "HS256".to_owned()
    }

    fn default_token_ttl_minutes() -> i64 {
        30
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("auth_secret", &"***")
            .field("auth_algorithm", &self.auth_algorithm)
            .field("auth_token_ttl_minutes", &self.auth_token_ttl_minutes)
            .finish()
    }
}

/// Errors surfaced by token issuance and validation.
///
/// Callers gating requests collapse all of these into a single
/// externally-visible authentication failure; the variants stay
/// distinguishable for logging and tests.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token lifetime or signing setup is unusable.
    #[error("session token configuration is invalid")]
    Configuration,
    /// Token could not be signed.
    #[error("session token could not be signed")]
    Signing,
    /// Signature or structure validation failed.
    #[error("session token is invalid")]
    Invalid,
    /// Decoded payload carries no subject claim.
    #[error("session token has no subject claim")]
    MissingSubject,
    /// Token expiry instant has passed.
    #[error("session token has expired")]
    Expired,
}

/// A freshly signed session token together with its validity window.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT ready for an `Authorization: Bearer` header.
    pub access_token: String,
    /// Instant the token was issued.
    pub issued_at: Timestamp,
    /// Instant the token stops being valid.
    pub expires_at: Timestamp,
}

impl IssuedToken {
    /// Token type tag presented to clients alongside the token.
    pub const TOKEN_TYPE: &'static str = "Bearer";
}

/// Claims carried by session tokens.
///
/// Matches RFC 7519 registered claim names; the subject is the canonical
/// decimal string of the account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    /// Subject (account id as a decimal string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    /// Issued at (seconds since the Unix epoch).
    iat: i64,
    /// Expiration time (seconds since the Unix epoch).
    exp: i64,
}

/// Secret keys used for JWT session authentication.
///
/// Provides thread-safe, cheaply clonable access to the encoding and
/// decoding keys plus the configured algorithm and token lifetime. There is
/// no ambient state: every holder received its keys explicitly from
/// configuration.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

/// Internal container for the actual key data.
struct SessionKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    token_ttl_minutes: i64,
}

impl SessionKeys {
    /// Creates a new `SessionKeys` instance from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is empty, the algorithm
    /// is not in the HMAC family, or the TTL is not positive.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        if config.auth_secret.trim().is_empty() {
            return Err(Error::config("session signing secret must not be empty"));
        }

        let algorithm = match config.auth_algorithm.as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                tracing::error!(
                    target: TRACING_TARGET,
                    algorithm = %other,
                    "unsupported session signing algorithm",
                );

                return Err(Error::config(
                    "session signing algorithm must be HS256, HS384, or HS512",
                ));
            }
        };

        if config.auth_token_ttl_minutes <= 0 {
            return Err(Error::config("session token TTL must be positive"));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            algorithm = %config.auth_algorithm,
            token_ttl_minutes = config.auth_token_ttl_minutes,
            "session keys initialized",
        );

        let inner = Arc::new(SessionKeysInner {
            encoding_key: EncodingKey::from_secret(config.auth_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.auth_secret.as_bytes()),
            algorithm,
            token_ttl_minutes: config.auth_token_ttl_minutes,
        });

        Ok(Self { inner })
    }

    /// Returns the configured token lifetime in minutes.
    #[inline]
    pub fn token_ttl_minutes(&self) -> i64 {
        self.inner.token_ttl_minutes
    }

    /// Signs a new session token for the given account.
    ///
    /// The subject claim is the account id serialized as a decimal string;
    /// the expiry is `now + ttl`.
    ///
    /// # Errors
    ///
    /// Fails with [`TokenError::Configuration`] if the TTL is not positive
    /// and [`TokenError::Signing`] if the JWT encoding fails.
    pub fn issue_token(&self, subject_id: i64) -> Result<IssuedToken, TokenError> {
        let ttl_minutes = self.inner.token_ttl_minutes;
        if ttl_minutes <= 0 {
            tracing::error!(
                target: TRACING_TARGET,
                token_ttl_minutes = ttl_minutes,
                "refusing to issue token with non-positive TTL",
            );
            return Err(TokenError::Configuration);
        }

        let issued_at = Timestamp::now();
        let expires_at = Timestamp::from_second(issued_at.as_second() + ttl_minutes * 60)
            .map_err(|_| TokenError::Configuration)?;

        let claims = SessionClaims {
            sub: Some(subject_id.to_string()),
            iat: issued_at.as_second(),
            exp: expires_at.as_second(),
        };

        let header = Header::new(self.inner.algorithm);
        let access_token = encode(&header, &claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                subject = subject_id,
                "failed to encode session token",
            );
            TokenError::Signing
        })?;

        Ok(IssuedToken {
            access_token,
            issued_at,
            expires_at,
        })
    }

    /// Validates a session token and returns its numeric subject id.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Expired`] when the expiry instant has passed
    /// - [`TokenError::MissingSubject`] when the payload has no `sub` claim
    /// - [`TokenError::Invalid`] for signature failures, malformed tokens,
    ///   and non-numeric subjects
    pub fn validate_token(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(self.inner.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data =
            decode::<SessionClaims>(token, &self.inner.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => {
                        tracing::debug!(
                            target: TRACING_TARGET,
                            error = %e,
                            "session token failed validation",
                        );
                        TokenError::Invalid
                    }
                }
            })?;

        let claims = token_data.claims;

        // Double-check expiration against our own clock
        if claims.exp <= Timestamp::now().as_second() {
            return Err(TokenError::Expired);
        }

        let Some(subject) = claims.sub else {
            return Err(TokenError::MissingSubject);
        };

        subject.parse::<i64>().map_err(|_| {
            tracing::debug!(
                target: TRACING_TARGET,
                "session token subject is not a numeric account id",
            );
            TokenError::Invalid
        })
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("algorithm", &self.inner.algorithm)
            .field("token_ttl_minutes", &self.inner.token_ttl_minutes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(ttl_minutes: i64) -> SessionKeysConfig {
        SessionKeysConfig {
            auth_secret: "test-signing-secret".to_owned(),
            auth_algorithm: "HS256".to_owned(),
            auth_token_ttl_minutes: ttl_minutes,
        }
    }

    fn test_keys() -> SessionKeys {
        SessionKeys::from_config(&test_config(30)).expect("valid test config")
    }

    #[test]
    fn issue_and_validate_round_trip() -> anyhow::Result<()> {
        let keys = test_keys();
        let issued = keys.issue_token(42)?;

        assert_eq!(keys.validate_token(&issued.access_token)?, 42);
        assert!(issued.expires_at > issued.issued_at);
        assert_eq!(
            issued.expires_at.as_second() - issued.issued_at.as_second(),
            30 * 60
        );

        Ok(())
    }

    #[test]
    fn config_rejects_non_positive_ttl() {
        assert!(SessionKeys::from_config(&test_config(0)).is_err());
        assert!(SessionKeys::from_config(&test_config(-5)).is_err());
    }

    #[test]
    fn config_rejects_empty_secret() {
        let mut config = test_config(30);
        config.auth_secret = "   ".to_owned();
        assert!(SessionKeys::from_config(&config).is_err());
    }

    #[test]
    fn config_rejects_non_hmac_algorithm() {
        let mut config = test_config(30);
        config.auth_algorithm = "EdDSA".to_owned();
        assert!(SessionKeys::from_config(&config).is_err());

        config.auth_algorithm = "not-an-algorithm".to_owned();
        assert!(SessionKeys::from_config(&config).is_err());
    }

    #[test]
    fn validation_rejects_tampered_signature() -> anyhow::Result<()> {
        let keys = test_keys();
        let issued = keys.issue_token(7)?;

        // Flip the final signature character
        let mut tampered = issued.access_token.clone();
        let last = tampered.pop().expect("token is non-empty");
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            keys.validate_token(&tampered),
            Err(TokenError::Invalid)
        ));

        Ok(())
    }

    #[test]
    fn validation_rejects_garbage_token() {
        let keys = test_keys();
        assert!(matches!(
            keys.validate_token("not-a-jwt"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn validation_rejects_expired_token() -> anyhow::Result<()> {
        let keys = test_keys();

        // Hand-craft a token whose expiry is already in the past
        let now = Timestamp::now().as_second();
        let claims = SessionClaims {
            sub: Some("42".to_owned()),
            iat: now - 600,
            exp: now - 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret"),
        )?;

        assert!(matches!(
            keys.validate_token(&token),
            Err(TokenError::Expired)
        ));

        Ok(())
    }

    #[test]
    fn validation_rejects_missing_subject() -> anyhow::Result<()> {
        let keys = test_keys();

        let now = Timestamp::now().as_second();
        let claims = SessionClaims {
            sub: None,
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret"),
        )?;

        assert!(matches!(
            keys.validate_token(&token),
            Err(TokenError::MissingSubject)
        ));

        Ok(())
    }

    #[test]
    fn validation_rejects_non_numeric_subject() -> anyhow::Result<()> {
        let keys = test_keys();

        let now = Timestamp::now().as_second();
        let claims = SessionClaims {
            sub: Some("not-a-number".to_owned()),
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret"),
        )?;

        assert!(matches!(
            keys.validate_token(&token),
            Err(TokenError::Invalid)
        ));

        Ok(())
    }
}
