//! File listing query parameters.
//!
//! Everything arrives as raw strings and is validated here: malformed
//! numbers are a `ValidationError` (HTTP 400), while `"all"` and empty
//! strings mean "no constraint". This is where the wire vocabulary
//! (`sortBy=name&sortOrder=desc`) becomes the typed filter.

use serde::Deserialize;

use archivio_core::error::AppError;
use archivio_core::presentation::Density;
use archivio_core::types::{PageRequest, SortOrder};
use archivio_entity::file::{FileFilter, FileSort, FileStatus, SortBy};
use archivio_service::file::ListFilesParams;

use super::pagination::parse_positive;

/// Default page size for file listings.
const DEFAULT_LIMIT: u64 = 12;

/// Raw query parameters of `GET /api/files`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilesQuery {
    /// Substring search over name and description.
    pub search: Option<String>,
    /// Department filter; `"all"` or empty means no constraint.
    pub department: Option<String>,
    /// File type filter; `"all"` or empty means no constraint.
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    /// Days-since-creation window.
    pub date: Option<String>,
    /// Approval status filter.
    pub status: Option<String>,
    /// Page number (1-based).
    pub page: Option<String>,
    /// Items per page.
    pub limit: Option<String>,
    /// Sort key: name, size, date, or type.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction: asc or desc.
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    /// Density the client currently renders at.
    pub density: Option<String>,
}

/// Treat `None`, empty, and `"all"` as "no constraint".
fn constraint(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "all")
}

impl ListFilesQuery {
    /// Validate and convert into typed listing parameters.
    pub fn into_params(self) -> Result<ListFilesParams, AppError> {
        let date_range_days = match self.date.as_deref().filter(|d| !d.is_empty()) {
            None => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::validation("'date' must be a number of days")
            })?),
        };

        let status = match self.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
            None => None,
            Some(raw) => Some(raw.parse::<FileStatus>()?),
        };

        let filter = FileFilter {
            search: self.search.filter(|s| !s.is_empty()),
            department: constraint(self.department),
            file_type: constraint(self.file_type),
            date_range_days,
            status,
            uploaded_by: None,
        };

        let sort = FileSort {
            by: match self.sort_by.as_deref().filter(|s| !s.is_empty()) {
                None => SortBy::Date,
                Some(raw) => raw.parse::<SortBy>()?,
            },
            order: match self.sort_order.as_deref().filter(|s| !s.is_empty()) {
                None => SortOrder::Desc,
                Some(raw) => raw.parse::<SortOrder>()?,
            },
        };

        let page = parse_positive("page", self.page.as_deref())?.unwrap_or(1);
        let limit = parse_positive("limit", self.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);

        let current_density = match self.density.as_deref().filter(|d| !d.is_empty()) {
            None => None,
            Some(raw) => Some(raw.parse::<Density>()?),
        };

        Ok(ListFilesParams {
            filter,
            sort,
            page: PageRequest::new(page, limit),
            current_density,
        })
    }
}
