//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `(from, size)` pagination parameters used by list endpoints.
///
/// `from` is an element offset, `size` a page length; they resolve to a
/// page via `lendit_core::pagination::Page::from_query`, which also
/// rejects negative `from` and non-positive `size`.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}
