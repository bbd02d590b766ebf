//! Aggregated statistics over the role-scoped file set and the user set.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use archivio_core::result::AppResult;
use archivio_database::store::{DepartmentStore, FileStore, UserStore};
use archivio_entity::file::FileFilter;
use archivio_entity::user::UserRole;

use crate::context::RequestContext;

/// Dashboard statistics for the calling user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of files visible to the caller.
    pub total_files: u64,
    /// Combined size in bytes of the visible files.
    pub total_size: i64,
    /// Number of active user accounts.
    pub active_users: u64,
    /// Number of departments.
    pub total_departments: u64,
    /// Visible file count grouped by file type.
    pub file_types: BTreeMap<String, u64>,
    /// Percentage share of each file type, rounded to whole percent.
    pub type_percentages: BTreeMap<String, u64>,
    /// Number of files the caller uploaded themselves.
    pub user_files: u64,
    /// Total number of user accounts.
    pub total_users: u64,
}

/// Computes dashboard statistics.
#[derive(Clone)]
pub struct StatsService {
    files: Arc<dyn FileStore>,
    users: Arc<dyn UserStore>,
    departments: Arc<dyn DepartmentStore>,
}

impl StatsService {
    /// Create a new stats service.
    pub fn new(
        files: Arc<dyn FileStore>,
        users: Arc<dyn UserStore>,
        departments: Arc<dyn DepartmentStore>,
    ) -> Self {
        Self {
            files,
            users,
            departments,
        }
    }

    /// Aggregate statistics for the caller.
    ///
    /// USER-role callers aggregate over their own department only; a user
    /// with no department sees zero files (their own uploads still count
    /// under `user_files`).
    pub async fn aggregate(&self, ctx: &RequestContext) -> AppResult<Stats> {
        let scope = match (ctx.role, ctx.department.as_deref()) {
            (UserRole::User, Some(department)) => {
                Some(FileFilter::default().scoped_to_department(department))
            }
            (UserRole::User, None) => None,
            _ => Some(FileFilter::default()),
        };

        let (total_files, total_size, file_types) = match &scope {
            Some(filter) => (
                self.files.count(filter).await?,
                self.files.total_size(filter).await?,
                self.files.count_by_type(filter).await?,
            ),
            None => (0, 0, Vec::new()),
        };

        let own_filter = FileFilter {
            uploaded_by: Some(ctx.user_id),
            ..Default::default()
        };
        let user_files = self.files.count(&own_filter).await?;

        let file_types: BTreeMap<String, u64> = file_types.into_iter().collect();
        let type_percentages = percentages(&file_types);

        Ok(Stats {
            total_files,
            total_size,
            active_users: self.users.count_active().await?,
            total_departments: self.departments.count_all().await?,
            file_types,
            type_percentages,
            user_files,
            total_users: self.users.count_all().await?,
        })
    }
}

/// Percentage share per key, rounded to whole percent.
///
/// An empty or all-zero distribution yields zero for every key instead of
/// propagating a division by zero.
pub fn percentages(counts: &BTreeMap<String, u64>) -> BTreeMap<String, u64> {
    let total: u64 = counts.values().sum();
    counts
        .iter()
        .map(|(key, count)| {
            let share = if total == 0 {
                0
            } else {
                ((*count as f64) * 100.0 / (total as f64)).round() as u64
            };
            (key.clone(), share)
        })
        .collect()
}
