//! High-level database client over an async connection pool.

use std::fmt;
use std::sync::Arc;

use deadpool::managed::Pool;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::Object;

use crate::{PgConfig, PgError, PgResult, TRACING_TARGET_CONNECTION};

/// A connection checked out of the pool.
pub type PooledConnection = Object<AsyncPgConnection>;

/// Internal pool alias.
type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// High-level database client that manages pooled connections.
///
/// This struct provides the main interface for database operations, encapsulating
/// connection pool management and configuration. Cloning is cheap: all clones
/// share the same underlying pool.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

/// Inner data for [`PgClient`].
struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// This will establish a connection pool. Connections themselves are
    /// created lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the pool
    /// cannot be constructed.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CONNECTION, "Initializing database client");

        config.validate()?;

        let manager = AsyncDieselConnectionManager::new(&config.postgres_url);
        let mut builder = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .runtime(deadpool::Runtime::Tokio1);

        if let Some(timeout) = config.connection_timeout() {
            builder = builder.wait_timeout(Some(timeout)).create_timeout(Some(timeout));
        }

        let pool = builder.build().map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                "Failed to create connection pool"
            );
            PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
        })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Checks a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is exhausted, closed, or a new
    /// connection cannot be established in time.
    pub async fn get_connection(&self) -> PgResult<PooledConnection> {
        self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                "Failed to get connection from pool"
            );
            PgError::from(e)
        })
    }

    /// Returns a reference to the configuration used to create this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("config", &self.inner.config)
            .field("pool_status", &self.inner.pool.status())
            .finish()
    }
}
