//! Authentication state extractor with database verification.
//!
//! [`AuthState`] resolves the presented bearer token to a live account:
//! the token signature and expiry are checked first, then the subject is
//! looked up so that a token minted for a since-deleted account does not
//! authenticate. Every failure along the way renders the same
//! `unauthenticated` response.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use notabene_postgres::PgClient;
use notabene_postgres::model::User;

use super::AuthHeader;
use crate::extract::auth::TRACING_TARGET;
use crate::handler::Error;
use crate::service::AuthService;

/// Authenticated caller, verified against the database.
///
/// When extraction succeeds the wrapped [`User`] row is current as of this
/// request: the token was cryptographically valid, unexpired, carried a
/// numeric subject, and that subject still exists.
///
/// # Usage
///
/// ```rust,ignore
/// use notabene_server::extract::AuthState;
///
/// async fn protected_handler(AuthState(current_user): AuthState) -> Result<impl IntoResponse> {
///     let author_id = current_user.id;
///     // ...
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState(pub User);

impl AuthState {
    /// Returns the verified account id of the caller.
    #[inline]
    pub fn user_id(&self) -> i64 {
        self.0.id
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    AuthService: FromRef<S>,
    PgClient: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return cached state if available: one verification per request
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;

        let auth_service = AuthService::from_ref(state);
        let pg_client = PgClient::from_ref(state);

        let mut conn = pg_client.get_connection().await?;
        let user = auth_service
            .authorize_bearer(&mut *conn, Some(auth_header.token()))
            .await?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = user.id,
            "bearer token resolved",
        );

        let auth_state = Self(user);
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}
