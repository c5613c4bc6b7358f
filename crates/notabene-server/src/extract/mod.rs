//! HTTP request extractors with structured error handling.
//!
//! # Extractor Categories
//!
//! ## Authentication
//!
//! - [`AuthHeader`] - bearer token extraction
//! - [`AuthState`] - verified caller state with database verification
//!
//! ## Request Data Extraction
//!
//! - [`Json`] - JSON deserialization with structured rejections
//! - [`ValidateJson`] - JSON extraction with automatic validation
//! - [`Path`] - path parameter extraction with structured rejections

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{AuthHeader, AuthState};
pub use crate::extract::reject::{Json, Path, ValidateJson};
