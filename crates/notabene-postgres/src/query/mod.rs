//! Database query repositories for all entities in the system.
//!
//! This module contains the repository traits that provide high-level
//! database operations for users and notes. Every note operation takes the
//! author id as a mandatory parameter and filters on it, so ownership is
//! enforced at this boundary rather than trusted to the caller.
//!
//! # Pagination
//!
//! All queries that may return large result sets use the [`Pagination`]
//! struct to provide consistent, bounded pagination across the system.

pub mod note;
pub mod user;

pub use note::NoteRepository;
use serde::{Deserialize, Serialize};
pub use user::UserRepository;

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            // Ensure limit is between 1 and 1000
            limit: limit.clamp(1, 1000),
            // Ensure offset is non-negative
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 1000);
        Self::new(page_size, (page - 1) * page_size)
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }

    /// Gets the page size.
    pub fn page_size(&self) -> i64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_new() {
        let pagination = Pagination::new(25, 100);
        assert_eq!(pagination.limit, 25);
        assert_eq!(pagination.offset, 100);
    }

    #[test]
    fn pagination_bounds_checking() {
        let pagination = Pagination::new(0, 10);
        assert_eq!(pagination.limit, 1);

        let pagination = Pagination::new(1500, 10);
        assert_eq!(pagination.limit, 1000);

        let pagination = Pagination::new(10, -5);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_from_page() {
        let pagination = Pagination::from_page(1, 20);
        assert_eq!(pagination.limit, 20);
        assert_eq!(pagination.offset, 0);

        let pagination = Pagination::from_page(2, 10);
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 10);

        // Page numbers below 1 are treated as the first page
        let pagination = Pagination::from_page(0, 10);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_page_number_round_trip() {
        let pagination = Pagination::from_page(3, 10);
        assert_eq!(pagination.page_number(), 3);
        assert_eq!(pagination.page_size(), 10);
    }
}
