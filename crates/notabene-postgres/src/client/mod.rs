//! Database client, configuration, and migration management.

mod migrate;
mod pg_client;
mod pg_config;

pub use self::migrate::run_pending_migrations;
pub use self::pg_client::{PgClient, PooledConnection};
pub use self::pg_config::PgConfig;
