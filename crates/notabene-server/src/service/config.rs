//! Application configuration.

#[cfg(feature = "config")]
use clap::Args;
use notabene_postgres::{PgClient, PgConfig};
use serde::{Deserialize, Serialize};

use crate::service::{AuthService, PasswordHasher, SessionKeys, SessionKeysConfig};
use crate::{Error, Result};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Postgres connection and pool settings.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub postgres: PgConfig,

    /// Session token signing settings.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub session: SessionKeysConfig,
}

impl ServiceConfig {
    /// Creates the Postgres client from this configuration.
    ///
    /// The pool is constructed eagerly; connections are established on
    /// first use.
    pub fn connect_postgres(&self) -> Result<PgClient> {
        PgClient::new(self.postgres.clone()).map_err(|e| {
            Error::config("failed to initialize the database client").with_source(e)
        })
    }

    /// Creates the authentication service from this configuration.
    ///
    /// Validates the signing secret, algorithm, and token TTL; an invalid
    /// session configuration fails startup here rather than at the first
    /// login.
    pub fn create_auth_service(&self) -> Result<AuthService> {
        let password_hasher = PasswordHasher::new()?;
        let session_keys = SessionKeys::from_config(&self.session)?;
        Ok(AuthService::new(password_hasher, session_keys))
    }
}
