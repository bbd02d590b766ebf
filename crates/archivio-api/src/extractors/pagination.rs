//! Pagination query parameters for simple list endpoints.
//!
//! Values arrive as raw strings so that non-numeric input becomes a
//! validation error rather than a silently dropped parameter.

use serde::Deserialize;

use archivio_core::error::AppError;
use archivio_core::types::PageRequest;

/// `page`/`limit` query parameters, unparsed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default 1).
    pub page: Option<String>,
    /// Items per page (default depends on the endpoint).
    pub limit: Option<String>,
}

impl PaginationParams {
    /// Parse into a [`PageRequest`], with the given default page size.
    pub fn into_page_request(self, default_limit: u64) -> Result<PageRequest, AppError> {
        let page = parse_positive("page", self.page.as_deref())?.unwrap_or(1);
        let limit = parse_positive("limit", self.limit.as_deref())?.unwrap_or(default_limit);
        Ok(PageRequest::new(page, limit))
    }
}

/// Parse an optional positive integer parameter.
pub(crate) fn parse_positive(name: &str, value: Option<&str>) -> Result<Option<u64>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let parsed: u64 = raw
                .parse()
                .map_err(|_| AppError::validation(format!("'{name}' must be a positive integer")))?;
            if parsed == 0 {
                return Err(AppError::validation(format!("'{name}' must be at least 1")));
            }
            Ok(Some(parsed))
        }
    }
}
