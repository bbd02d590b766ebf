//! Department entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An organizational department that users and files belong to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    /// Unique department identifier.
    pub id: Uuid,
    /// Unique department name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the department was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartment {
    /// Unique department name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Fields that can be changed on an existing department.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDepartment {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// A department with its derived membership counts, as listed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentWithCounts {
    /// The department itself.
    #[serde(flatten)]
    pub department: Department,
    /// Number of users assigned to the department.
    pub user_count: u64,
    /// Number of live (non-deleted) files in the department.
    pub file_count: u64,
}
