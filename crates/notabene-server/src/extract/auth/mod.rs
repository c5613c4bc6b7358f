//! Authentication extractors.
//!
//! # Key Types
//!
//! - [`AuthHeader`] - raw bearer token extraction
//! - [`AuthState`] - verified caller with database-backed resolution

mod auth_header;
mod auth_state;

/// Tracing target for authentication extraction.
pub(crate) const TRACING_TARGET: &str = "notabene_server::extract::auth";

pub use self::auth_header::AuthHeader;
pub use self::auth_state::AuthState;
