//! Filter and sort vocabulary for file listings.
//!
//! [`FileFilter::matches`] is the reference semantics of the listing
//! contract; the SQL store mirrors it clause for clause. Soft-deleted rows
//! are rejected before any other criterion is consulted.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use archivio_core::types::SortOrder;

use super::model::StoredFile;
use super::status::FileStatus;

/// Composable filter over the file collection.
///
/// `None` fields mean "no constraint". Department and file type are exact
/// matches; search is a case-insensitive substring match against the
/// display name or description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileFilter {
    /// Substring to match against `original_name` or `description`.
    pub search: Option<String>,
    /// Exact department name.
    pub department: Option<String>,
    /// Exact file type (lowercased extension).
    pub file_type: Option<String>,
    /// Keep only rows created within the last N days (inclusive).
    pub date_range_days: Option<i64>,
    /// Exact approval status.
    pub status: Option<FileStatus>,
    /// Exact owning user.
    pub uploaded_by: Option<Uuid>,
}

impl FileFilter {
    /// Narrow this filter to a single department, replacing any requested one.
    ///
    /// Used to scope USER-role callers to their own department regardless of
    /// what the request asked for.
    pub fn scoped_to_department(mut self, department: &str) -> Self {
        self.department = Some(department.to_string());
        self
    }

    /// Decide whether `file` satisfies every active criterion at time `now`.
    pub fn matches(&self, file: &StoredFile, now: DateTime<Utc>) -> bool {
        // Soft-deleted rows are invisible to every query.
        if file.is_deleted {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_name = file.original_name.to_lowercase().contains(&needle);
            let in_description = file
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }

        if let Some(department) = &self.department {
            if file.department.as_deref() != Some(department.as_str()) {
                return false;
            }
        }

        if let Some(file_type) = &self.file_type {
            if file.file_type != *file_type {
                return false;
            }
        }

        if let Some(days) = self.date_range_days {
            // Rows without a creation time cannot satisfy a date filter.
            match file.created_at {
                Some(created_at) => {
                    if now - created_at > Duration::days(days) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        if let Some(status) = self.status {
            if file.status != status {
                return false;
            }
        }

        if let Some(uploaded_by) = self.uploaded_by {
            if file.uploaded_by != Some(uploaded_by) {
                return false;
            }
        }

        true
    }
}

/// Sortable columns of a file listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Lexicographic on the display name.
    Name,
    /// Numeric on the payload size.
    Size,
    /// Chronological on the upload time.
    #[default]
    Date,
    /// Lexicographic on the file type.
    Type,
}

impl SortBy {
    /// Return the SQL column expression for this key.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Name => "original_name",
            Self::Size => "file_size",
            Self::Date => "created_at",
            Self::Type => "file_type",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Date => "date",
            Self::Type => "type",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SortBy {
    type Err = archivio_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "date" => Ok(Self::Date),
            "type" => Ok(Self::Type),
            _ => Err(archivio_core::AppError::validation(format!(
                "Invalid sort key: '{s}'. Expected one of: name, size, date, type"
            ))),
        }
    }
}

/// A full sort specification: key plus direction.
///
/// Ordering is total and deterministic: ties on the key are always broken
/// by `id` ascending, independent of the direction, so repeated queries
/// paginate identically.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FileSort {
    /// Column to sort by.
    pub by: SortBy,
    /// Sort direction.
    pub order: SortOrder,
}

impl FileSort {
    /// Create a new sort specification.
    pub fn new(by: SortBy, order: SortOrder) -> Self {
        Self { by, order }
    }

    /// Compare two files under this specification.
    pub fn compare(&self, a: &StoredFile, b: &StoredFile) -> Ordering {
        let key_ordering = match self.by {
            SortBy::Name => a.original_name.cmp(&b.original_name),
            SortBy::Size => a.file_size.cmp(&b.file_size),
            SortBy::Date => a.created_at.cmp(&b.created_at),
            SortBy::Type => a.file_type.cmp(&b.file_type),
        };
        self.order
            .apply(key_ordering)
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, dept: Option<&str>, file_type: &str, size: i64) -> StoredFile {
        StoredFile {
            id: Uuid::new_v4(),
            filename: name.to_lowercase().replace(' ', "_"),
            original_name: name.to_string(),
            file_type: file_type.to_string(),
            file_size: size,
            file_path: format!("/uploads/{name}"),
            uploaded_by: None,
            department: dept.map(String::from),
            category: None,
            description: None,
            status: FileStatus::Approved,
            created_at: Some(Utc::now()),
            is_deleted: false,
        }
    }

    #[test]
    fn test_soft_deleted_rows_never_match() {
        let mut f = file("budget.xlsx", Some("HR"), "xlsx", 100);
        f.is_deleted = true;
        assert!(!FileFilter::default().matches(&f, Utc::now()));
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let mut f = file("Quarterly Report.pdf", Some("HR"), "pdf", 100);
        f.description = Some("Consolidated budget figures".to_string());

        let by_name = FileFilter {
            search: Some("quarterly".to_string()),
            ..Default::default()
        };
        let by_description = FileFilter {
            search: Some("BUDGET".to_string()),
            ..Default::default()
        };
        let miss = FileFilter {
            search: Some("payroll".to_string()),
            ..Default::default()
        };

        let now = Utc::now();
        assert!(by_name.matches(&f, now));
        assert!(by_description.matches(&f, now));
        assert!(!miss.matches(&f, now));
    }

    #[test]
    fn test_date_range_boundary_is_inclusive() {
        let now = Utc::now();
        let mut f = file("old.pdf", None, "pdf", 10);
        f.created_at = Some(now - Duration::days(7));

        let seven = FileFilter {
            date_range_days: Some(7),
            ..Default::default()
        };
        let six = FileFilter {
            date_range_days: Some(6),
            ..Default::default()
        };
        assert!(seven.matches(&f, now));
        assert!(!six.matches(&f, now));
    }

    #[test]
    fn test_date_filter_excludes_rows_without_timestamp() {
        let mut f = file("undated.pdf", None, "pdf", 10);
        f.created_at = None;
        let filter = FileFilter {
            date_range_days: Some(30),
            ..Default::default()
        };
        assert!(!filter.matches(&f, Utc::now()));
        // Without the date filter the row is visible.
        assert!(FileFilter::default().matches(&f, Utc::now()));
    }

    #[test]
    fn test_scoped_to_department_overrides_requested_department() {
        let filter = FileFilter {
            department: Some("IT".to_string()),
            ..Default::default()
        };
        let scoped = filter.scoped_to_department("HR");
        assert_eq!(scoped.department.as_deref(), Some("HR"));
    }

    #[test]
    fn test_sort_ties_break_by_id_ascending() {
        let mut a = file("same.pdf", None, "pdf", 100);
        let mut b = file("same.pdf", None, "pdf", 100);
        // Force a known id order.
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);
        let ts = Utc::now();
        a.created_at = Some(ts);
        b.created_at = Some(ts);

        let asc = FileSort::new(SortBy::Name, SortOrder::Asc);
        let desc = FileSort::new(SortBy::Name, SortOrder::Desc);
        assert_eq!(asc.compare(&a, &b), Ordering::Less);
        // Direction does not flip the tie-break.
        assert_eq!(desc.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_sort_by_size_desc() {
        let small = file("a.pdf", None, "pdf", 10);
        let large = file("b.pdf", None, "pdf", 999);
        let sort = FileSort::new(SortBy::Size, SortOrder::Desc);
        assert_eq!(sort.compare(&large, &small), Ordering::Less);
    }
}
