//! Offset/limit pagination derived from `(from, size)` query parameters.

use crate::error::CoreError;

/// A resolved page: the `LIMIT` / `OFFSET` pair for a store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Resolve `(from, size)` into a page.
    ///
    /// The page index is `from / size` (integer division), so the offset
    /// snaps to a page boundary: `from=7, size=3` lands on the third page
    /// (offset 6). Callers send `from` as an element offset; the store is
    /// queried in whole pages.
    pub fn from_query(from: i64, size: i64) -> Result<Self, CoreError> {
        if from < 0 {
            return Err(CoreError::Validation(
                "from must not be negative".to_string(),
            ));
        }
        if size <= 0 {
            return Err(CoreError::Validation("size must be positive".to_string()));
        }
        Ok(Page {
            limit: size,
            offset: (from / size) * size,
        })
    }
}
