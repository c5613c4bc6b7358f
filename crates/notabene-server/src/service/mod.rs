//! Application state and dependency injection.

mod auth;
mod config;
mod security;

use notabene_postgres::PgClient;

pub use crate::service::auth::AuthService;
pub use crate::service::config::ServiceConfig;
pub use crate::service::security::{
    IssuedToken, PasswordHasher, SessionKeys, SessionKeysConfig, TokenError,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    postgres: PgClient,
    auth: AuthService,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Builds the database client and validates the authentication
    /// configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            postgres: config.connect_postgres()?,
            auth: config.create_auth_service()?,
        };

        Ok(service_state)
    }

    /// Creates application state from already-constructed services.
    pub fn new(postgres: PgClient, auth: AuthService) -> Self {
        Self { postgres, auth }
    }

    /// Returns the Postgres client.
    #[inline]
    pub fn postgres(&self) -> &PgClient {
        &self.postgres
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(postgres: PgClient);
impl_di!(auth: AuthService);

impl axum::extract::FromRef<ServiceState> for SessionKeys {
    fn from_ref(state: &ServiceState) -> Self {
        state.auth.session_keys().clone()
    }
}

impl axum::extract::FromRef<ServiceState> for PasswordHasher {
    fn from_ref(state: &ServiceState) -> Self {
        state.auth.password_hasher().clone()
    }
}
