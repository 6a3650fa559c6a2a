use serde::{Deserialize, Serialize};

/// Pagination parameters. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl Pageable {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// `(page - 1) * limit`, or `None` when that overflows an `i64`.
    ///
    /// Not clamped: `page <= 0` gives a negative offset.
    pub fn offset(&self) -> Option<i64> {
        self.page.checked_sub(1)?.checked_mul(self.limit)
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: i64) -> Self {
        let total_pages = if pageable.limit <= 0 {
            0
        } else {
            let whole = total_elements / pageable.limit;
            if total_elements % pageable.limit > 0 {
                whole + 1
            } else {
                whole
            }
        };
        Self {
            content,
            page: pageable.page,
            limit: pageable.limit,
            total_elements,
            total_pages,
        }
    }
}
