//! Query-string pagination parameters for list handlers.

use notabene_postgres::query::Pagination;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Default page size for list endpoints.
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Pagination parameters accepted by list endpoints.
///
/// Pages are 1-based; out-of-range values are clamped rather than
/// rejected, so `page=0` reads as the first page.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// 1-based page number.
    pub page: i64,
    /// Number of items per page (1-1000).
    pub per_page: i64,
}

impl PaginationQuery {
    /// Converts the query parameters into repository pagination.
    pub fn to_pagination(self) -> Pagination {
        Pagination::from_page(self.page, self.per_page)
    }

    /// Returns the effective 1-based page number.
    pub fn page_number(self) -> i64 {
        self.page.max(1)
    }

    /// Returns the effective page size.
    pub fn page_size(self) -> i64 {
        self.per_page.clamp(1, 1000)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_page_offsets_past_the_first() {
        let query = PaginationQuery {
            page: 2,
            per_page: 10,
        };
        let pagination = query.to_pagination();

        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 10);
    }

    #[test]
    fn defaults_start_at_the_first_page() {
        let pagination = PaginationQuery::default().to_pagination();
        assert_eq!(pagination.offset, 0);
        assert_eq!(pagination.limit, DEFAULT_PAGE_SIZE);
    }
}
