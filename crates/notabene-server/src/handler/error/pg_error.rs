//! Database error to HTTP error conversion.
//!
//! Repository failures are logged with their full detail and collapsed to
//! generic HTTP errors; the only structured case is the unique-email
//! constraint, which maps to the email-taken conflict.

use notabene_postgres::PgError;

use crate::handler::{Error, ErrorKind};

/// Tracing target for database error conversion.
const TRACING_TARGET: &str = "notabene_server::handler::pg_error";

/// Unique constraint on `users.email_address`.
const USERS_EMAIL_CONSTRAINT: &str = "users_email_address_key";

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if error.is_unique_violation() {
            let constraint = error.constraint().unwrap_or_default();
            if constraint.is_empty() || constraint == USERS_EMAIL_CONSTRAINT {
                tracing::info!(
                    target: TRACING_TARGET,
                    constraint = %constraint,
                    "unique constraint violation"
                );
                return ErrorKind::EmailTaken.into_error();
            }
        }

        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(query_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "database query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(message) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %message,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
