//! Shared response types for handlers.

mod error_response;

pub use self::error_response::ErrorResponse;
