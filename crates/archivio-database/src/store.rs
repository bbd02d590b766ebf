//! Storage contracts consumed by the service layer.
//!
//! Each trait has a PostgreSQL implementation in [`crate::postgres`] and an
//! in-process implementation in [`crate::memory`]. Both honor the same
//! contract, most importantly: soft-deleted files are invisible to every
//! file query, count, and aggregate, and file query ordering is total
//! (ties broken by `id` ascending) so pagination is stable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use archivio_core::result::AppResult;
use archivio_core::types::{Page, PageRequest};
use archivio_entity::activity::{ActivityEvent, CreateActivityEvent};
use archivio_entity::department::{CreateDepartment, Department, UpdateDepartment};
use archivio_entity::file::{CreateStoredFile, FileFilter, FileSort, FileStatus, StoredFile};
use archivio_entity::user::{CreateUser, User};

/// User persistence contract.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Batch-fetch users by ID. Missing IDs are silently absent.
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;

    /// Create a new user. Duplicate username/email yields a Conflict error.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Stamp a successful login.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Delete a user. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// List users with pagination, ordered by creation time then ID.
    async fn list(&self, page: &PageRequest) -> AppResult<Page<User>>;

    /// Count users assigned to a department.
    async fn count_by_department(&self, department: &str) -> AppResult<u64>;

    /// Count active users.
    async fn count_active(&self) -> AppResult<u64>;

    /// Count all users.
    async fn count_all(&self) -> AppResult<u64>;
}

/// Department persistence contract.
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// Find a department by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>>;

    /// Find a department by its unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>>;

    /// Create a new department. Duplicate names yield a Conflict error.
    async fn create(&self, data: &CreateDepartment) -> AppResult<Department>;

    /// Update a department's name/description.
    async fn update(&self, id: Uuid, patch: &UpdateDepartment) -> AppResult<Option<Department>>;

    /// Delete a department. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// List every department, ordered by name.
    async fn list_all(&self) -> AppResult<Vec<Department>>;

    /// Count all departments.
    async fn count_all(&self) -> AppResult<u64>;
}

/// File persistence contract.
///
/// Soft-deleted rows never escape any method here except nothing: even
/// `find_by_id` treats them as absent.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Find a live (non-deleted) file by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StoredFile>>;

    /// Create a new file record.
    async fn create(&self, data: &CreateStoredFile) -> AppResult<StoredFile>;

    /// Move a file to a new approval status.
    async fn set_status(&self, id: Uuid, status: FileStatus) -> AppResult<Option<StoredFile>>;

    /// Soft-delete a file. Returns `true` if a live row was flagged.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;

    /// Run a filtered, sorted, paginated query.
    ///
    /// `total` in the returned page reflects the full filtered count; a
    /// page past the end returns empty data rather than an error.
    async fn query(
        &self,
        filter: &FileFilter,
        sort: FileSort,
        page: &PageRequest,
    ) -> AppResult<Page<StoredFile>>;

    /// Count files matching the filter.
    async fn count(&self, filter: &FileFilter) -> AppResult<u64>;

    /// Sum of `file_size` over files matching the filter.
    async fn total_size(&self, filter: &FileFilter) -> AppResult<i64>;

    /// Count files matching the filter, grouped by file type.
    async fn count_by_type(&self, filter: &FileFilter) -> AppResult<Vec<(String, u64)>>;
}

/// Append-only activity log contract.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Append an entry to the log.
    async fn record(&self, entry: &CreateActivityEvent) -> AppResult<ActivityEvent>;

    /// Fetch the most recent entries, newest first.
    async fn recent(&self, limit: u64) -> AppResult<Vec<ActivityEvent>>;
}
