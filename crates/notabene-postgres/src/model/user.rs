//! Main user model for PostgreSQL database operations.
//!
//! This module provides the core user model for authentication and account
//! management.
//!
//! ## Models
//!
//! - [`User`] - Main user model with credentials and profile information
//! - [`NewUser`] - Data structure for creating new user accounts
//! - [`UpdateUser`] - Data structure for updating existing accounts

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::users;

/// Main user model representing an account in the system.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique account identifier.
    pub id: i64,
    /// Human-readable name for UI and communications (1-100 characters).
    pub display_name: String,
    /// Primary email for authentication, stored lowercase, unique.
    pub email_address: String,
    /// Securely hashed password in PHC string format.
    pub password_hash: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Human-readable name for UI and communications.
    pub display_name: String,
    /// Primary email for authentication.
    pub email_address: String,
    /// Securely hashed password in PHC string format.
    pub password_hash: String,
}

/// Data for updating a user account.
///
/// Only fields set to `Some(value)` are written.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    /// Human-readable name for UI and communications.
    pub display_name: Option<String>,
    /// Primary email for authentication.
    pub email_address: Option<String>,
    /// Securely hashed password in PHC string format.
    pub password_hash: Option<String>,
    /// Timestamp when the account was last updated.
    pub updated_at: Option<Timestamp>,
}

impl UpdateUser {
    /// Returns whether this changeset writes any field besides the timestamp.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.email_address.is_none()
            && self.password_hash.is_none()
    }
}
