use crate::ApiError;

use super::scope::Window;

/// Pages at or above this are rejected.
pub const PAGE_LIMIT: u64 = 99_999_999;
pub const MAX_PER_PAGE: u64 = 100;
pub const DEFAULT_PER_PAGE: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;

/// Reject page numbers outside `[1, PAGE_LIMIT)`.
///
/// # Errors
///
/// Returns a bad request error for an out-of-range page.
pub fn validate_page(page: u64) -> Result<u64, ApiError> {
    if page == 0 {
        return Err(ApiError::bad_request("page must be at least 1"));
    }
    if page >= PAGE_LIMIT {
        return Err(ApiError::bad_request("page is too big!"));
    }
    Ok(page)
}

/// Reject page sizes outside `(0, MAX_PER_PAGE]`.
///
/// # Errors
///
/// Returns a bad request error for an out-of-range page size.
pub fn validate_per(per: u64) -> Result<u64, ApiError> {
    if per == 0 {
        return Err(ApiError::bad_request("per must be at least 1"));
    }
    if per > MAX_PER_PAGE {
        return Err(ApiError::bad_request(format!(
            "not allowed to return more than {MAX_PER_PAGE} items in one page!"
        )));
    }
    Ok(per)
}

/// Offset window covering records `[(page - 1) * per, page * per)`.
///
/// Expects bounds already checked with [`validate_page`] and [`validate_per`].
#[must_use]
pub fn window(page: u64, per: u64) -> Window {
    Window {
        offset: page.saturating_sub(1).saturating_mul(per),
        limit: per,
    }
}
