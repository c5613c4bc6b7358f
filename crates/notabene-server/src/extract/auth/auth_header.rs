//! Bearer token extraction from the `Authorization` header.
//!
//! This extractor only pulls the raw token out of the request; validation
//! and account resolution happen in [`AuthState`].
//!
//! [`AuthState`]: crate::extract::AuthState

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind};

/// Bearer token presented in the `Authorization` header.
///
/// Extraction fails when the header is missing or does not carry a Bearer
/// token; both failures render the same `unauthenticated` response as any
/// other token rejection.
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    token: String,
}

impl AuthHeader {
    /// Creates an `AuthHeader` from a raw token string.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the raw bearer token.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return cached header if available to avoid re-parsing
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => {
                let auth_header = Self::new(bearer_header.token());
                // Cache for subsequent extractors in the same request
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => {
                        tracing::debug!(
                            target: TRACING_TARGET_AUTHENTICATION,
                            "request without Authorization header on protected route",
                        );
                        ErrorKind::MissingAuthToken.into_error()
                    }
                    TypedHeaderRejectionReason::Error(_) => {
                        tracing::debug!(
                            target: TRACING_TARGET_AUTHENTICATION,
                            "Authorization header is not a valid Bearer token",
                        );
                        ErrorKind::MalformedAuthToken.into_error()
                    }
                    _ => ErrorKind::InternalServerError
                        .with_context("Unexpected error during header extraction")
                        .into_static(),
                };
                Err(error)
            }
        }
    }
}
