//! Authentication flows: signup, login, bearer-token resolution, logout.
//!
//! [`AuthService`] owns the password hasher and the session keys and runs
//! every credential decision in one place. The flows are generic over the
//! user repository trait, so they execute identically against Postgres and
//! against the in-memory store used in tests.

use notabene_postgres::model::{NewUser, User};
use notabene_postgres::query::UserRepository;

use crate::handler::{ErrorKind, Result};
use crate::service::{IssuedToken, PasswordHasher, SessionKeys, TokenError};

/// Tracing target for authentication flows.
const TRACING_TARGET: &str = "notabene_server::service::auth";

/// Authentication gate for the HTTP surface.
///
/// Every protected route resolves its caller through
/// [`AuthService::authorize_bearer`]; signup and login are the only paths
/// that touch plaintext credentials.
#[derive(Debug, Clone)]
pub struct AuthService {
    password_hasher: PasswordHasher,
    session_keys: SessionKeys,
}

impl AuthService {
    /// Creates a new authentication service from its two dependencies.
    pub fn new(password_hasher: PasswordHasher, session_keys: SessionKeys) -> Self {
        Self {
            password_hasher,
            session_keys,
        }
    }

    /// Returns the password hasher.
    #[inline]
    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }

    /// Returns the session keys.
    #[inline]
    pub fn session_keys(&self) -> &SessionKeys {
        &self.session_keys
    }

    /// Registers a new account.
    ///
    /// Fails with `email_taken` when the address is already registered,
    /// whether detected by the pre-check or by the unique constraint when
    /// two signups race. The returned [`User`] is the freshly inserted row;
    /// callers expose only its public fields.
    pub async fn signup<R>(
        &self,
        repo: &mut R,
        display_name: &str,
        email_address: &str,
        password: &str,
    ) -> Result<User>
    where
        R: UserRepository + Send,
    {
        let normalized_email = email_address.trim().to_lowercase();

        if repo.email_exists(&normalized_email).await? {
            tracing::info!(
                target: TRACING_TARGET,
                email = %normalized_email,
                "signup rejected: email already registered",
            );
            return Err(ErrorKind::EmailTaken.into_error());
        }

        let password_hash = self.password_hasher.hash_password(password)?;

        let new_user = NewUser {
            display_name: display_name.to_owned(),
            email_address: normalized_email,
            password_hash,
        };

        let user = repo.create_user(new_user).await.map_err(|e| {
            if e.is_unique_violation() {
                ErrorKind::EmailTaken.into_error()
            } else {
                e.into()
            }
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = user.id,
            "account created",
        );

        Ok(user)
    }

    /// Authenticates an account and issues a session token.
    ///
    /// Unknown email and wrong password both produce the identical
    /// `invalid_credentials` failure, and the unknown-email path still
    /// burns a hash verification so the two cases are not distinguishable
    /// by response or by timing.
    pub async fn login<R>(
        &self,
        repo: &mut R,
        email_address: &str,
        password: &str,
    ) -> Result<(User, IssuedToken)>
    where
        R: UserRepository + Send,
    {
        let normalized_email = email_address.trim().to_lowercase();
        let user = repo.find_user_by_email(&normalized_email).await?;

        let password_valid = match &user {
            Some(user) => self
                .password_hasher
                .verify_password(password, &user.password_hash)
                .is_ok(),
            None => self.password_hasher.verify_dummy_password(password),
        };

        let Some(user) = user.filter(|_| password_valid) else {
            tracing::warn!(
                target: TRACING_TARGET,
                email = %normalized_email,
                "login failed",
            );
            return Err(ErrorKind::InvalidCredentials.into_error());
        };

        let issued = self.session_keys.issue_token(user.id).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                user_id = user.id,
                error = %e,
                "failed to issue session token",
            );
            ErrorKind::InternalServerError.into_error()
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = user.id,
            expires_at = %issued.expires_at,
            "login succeeded",
        );

        Ok((user, issued))
    }

    /// Resolves a presented bearer token to its account.
    ///
    /// Absent, expired, malformed, or unsigned tokens - and tokens whose
    /// subject no longer exists - all fail with the same
    /// externally-visible `unauthenticated` error.
    pub async fn authorize_bearer<R>(&self, repo: &mut R, bearer: Option<&str>) -> Result<User>
    where
        R: UserRepository + Send,
    {
        let Some(token) = bearer else {
            return Err(ErrorKind::MissingAuthToken.into_error());
        };

        let subject_id = self.session_keys.validate_token(token).map_err(|e| {
            tracing::debug!(
                target: TRACING_TARGET,
                error = %e,
                "bearer token rejected",
            );

            match e {
                TokenError::Expired => ErrorKind::ExpiredAuthToken.into_error(),
                TokenError::MissingSubject | TokenError::Invalid => {
                    ErrorKind::MalformedAuthToken.into_error()
                }
                TokenError::Configuration | TokenError::Signing => {
                    ErrorKind::InternalServerError.into_error()
                }
            }
        })?;

        let Some(user) = repo.find_user_by_id(subject_id).await? else {
            // A token for a deleted account must not resolve
            tracing::warn!(
                target: TRACING_TARGET,
                user_id = subject_id,
                "bearer token subject no longer exists",
            );
            return Err(ErrorKind::Unauthorized.into_error());
        };

        Ok(user)
    }

    /// Acknowledges a logout.
    ///
    /// Session tokens are stateless and there is no server-side session
    /// store, so nothing is invalidated here: the token stays usable until
    /// its natural expiry and clients discard their copy.
    pub fn logout(&self, user_id: i64) {
        tracing::info!(
            target: TRACING_TARGET,
            user_id = user_id,
            "logout acknowledged",
        );
    }
}
