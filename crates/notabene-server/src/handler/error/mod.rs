//! Handler error types and conversions from lower layers.

mod http_error;
mod pg_error;

pub use self::http_error::{Error, ErrorKind, Result};
