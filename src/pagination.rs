use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// `page` member of `r/find/page`. `index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub index: u64,
    pub size: u64,
}

impl Pagination {
    /// Validate the page against `max_size` and return `(offset, limit)`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` when `index` is 0 or `size` is outside
    /// `1..=max_size`.
    pub fn offset_limit(&self, max_size: u64) -> Result<(u64, u64), ApiError> {
        if self.index == 0 {
            return Err(ApiError::bad_request("page index starts at 1"));
        }
        if self.size == 0 || self.size > max_size {
            return Err(ApiError::bad_request(format!(
                "page size must be between 1 and {max_size}"
            )));
        }
        let offset = (self.index - 1)
            .checked_mul(self.size)
            .ok_or_else(|| ApiError::bad_request("page index is too large"))?;
        Ok((offset, self.size))
    }
}

/// Data of a `r/find/page` reply: `{"lists":[...],"total":N}`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub lists: Vec<T>,
    pub total: u64,
}
