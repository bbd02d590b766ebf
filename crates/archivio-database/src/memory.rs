//! In-memory store implementation for single-node tests.
//!
//! Implements the same contracts as the PostgreSQL stores, with
//! [`FileFilter::matches`] and [`FileSort::compare`] as the query
//! semantics. State lives behind one Tokio mutex; suitable for tests and
//! single-process tooling only.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use archivio_core::error::AppError;
use archivio_core::result::AppResult;
use archivio_core::types::{Page, PageRequest};
use archivio_entity::activity::{ActivityEvent, CreateActivityEvent};
use archivio_entity::department::{CreateDepartment, Department, UpdateDepartment};
use archivio_entity::file::{CreateStoredFile, FileFilter, FileSort, FileStatus, StoredFile};
use archivio_entity::user::{CreateUser, User};

use crate::store::{ActivityStore, DepartmentStore, FileStore, UserStore};

/// Mutable state behind the store mutex.
#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    departments: Vec<Department>,
    files: Vec<StoredFile>,
    activity: Vec<ActivityEvent>,
}

/// In-memory implementation of every store contract.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed file row, bypassing creation defaults.
    ///
    /// Test seam: lets tests control `id`, `created_at`, and `is_deleted`.
    pub async fn insert_file_raw(&self, file: StoredFile) {
        self.state.lock().await.files.push(file);
    }

    /// Insert a fully-formed user row, bypassing creation defaults.
    pub async fn insert_user_raw(&self, user: User) {
        self.state.lock().await.users.push(user);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                data.username
            )));
        }
        if state.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                data.email
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            department: data.department.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        Ok(state.users.len() < before)
    }

    async fn list(&self, page: &PageRequest) -> AppResult<Page<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state.users.clone();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let total = users.len() as u64;
        let data = users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Page::new(data, page, total))
    }

    async fn count_by_department(&self, department: &str) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .filter(|u| u.department.as_deref() == Some(department))
            .count() as u64)
    }

    async fn count_active(&self) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state.users.iter().filter(|u| u.is_active).count() as u64)
    }

    async fn count_all(&self) -> AppResult<u64> {
        Ok(self.state.lock().await.users.len() as u64)
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>> {
        let state = self.state.lock().await;
        Ok(state.departments.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        let state = self.state.lock().await;
        Ok(state.departments.iter().find(|d| d.name == name).cloned())
    }

    async fn create(&self, data: &CreateDepartment) -> AppResult<Department> {
        let mut state = self.state.lock().await;
        if state.departments.iter().any(|d| d.name == data.name) {
            return Err(AppError::conflict(format!(
                "Department '{}' already exists",
                data.name
            )));
        }
        let department = Department {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: Utc::now(),
        };
        state.departments.push(department.clone());
        Ok(department)
    }

    async fn update(&self, id: Uuid, patch: &UpdateDepartment) -> AppResult<Option<Department>> {
        let mut state = self.state.lock().await;
        if let Some(new_name) = &patch.name {
            if state
                .departments
                .iter()
                .any(|d| d.id != id && d.name == *new_name)
            {
                return Err(AppError::conflict("Another department already uses that name"));
            }
        }
        let Some(department) = state.departments.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            department.name = name.clone();
        }
        if let Some(description) = &patch.description {
            department.description = Some(description.clone());
        }
        Ok(Some(department.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.departments.len();
        state.departments.retain(|d| d.id != id);
        Ok(state.departments.len() < before)
    }

    async fn list_all(&self) -> AppResult<Vec<Department>> {
        let state = self.state.lock().await;
        let mut departments = state.departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn count_all(&self) -> AppResult<u64> {
        Ok(self.state.lock().await.departments.len() as u64)
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StoredFile>> {
        let state = self.state.lock().await;
        Ok(state
            .files
            .iter()
            .find(|f| f.id == id && !f.is_deleted)
            .cloned())
    }

    async fn create(&self, data: &CreateStoredFile) -> AppResult<StoredFile> {
        let mut state = self.state.lock().await;
        let file = StoredFile {
            id: Uuid::new_v4(),
            filename: data.filename.clone(),
            original_name: data.original_name.clone(),
            file_type: data.file_type.clone(),
            file_size: data.file_size,
            file_path: data.file_path.clone(),
            uploaded_by: data.uploaded_by,
            department: data.department.clone(),
            category: data.category.clone(),
            description: data.description.clone(),
            status: data.status,
            created_at: Some(Utc::now()),
            is_deleted: false,
        };
        state.files.push(file.clone());
        Ok(file)
    }

    async fn set_status(&self, id: Uuid, status: FileStatus) -> AppResult<Option<StoredFile>> {
        let mut state = self.state.lock().await;
        let Some(file) = state.files.iter_mut().find(|f| f.id == id && !f.is_deleted) else {
            return Ok(None);
        };
        file.status = status;
        Ok(Some(file.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(file) = state.files.iter_mut().find(|f| f.id == id && !f.is_deleted) else {
            return Ok(false);
        };
        file.is_deleted = true;
        Ok(true)
    }

    async fn query(
        &self,
        filter: &FileFilter,
        sort: FileSort,
        page: &PageRequest,
    ) -> AppResult<Page<StoredFile>> {
        let state = self.state.lock().await;
        let now = Utc::now();
        let mut matching: Vec<StoredFile> = state
            .files
            .iter()
            .filter(|f| filter.matches(f, now))
            .cloned()
            .collect();
        matching.sort_by(|a, b| sort.compare(a, b));
        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Page::new(data, page, total))
    }

    async fn count(&self, filter: &FileFilter) -> AppResult<u64> {
        let state = self.state.lock().await;
        let now = Utc::now();
        Ok(state.files.iter().filter(|f| filter.matches(f, now)).count() as u64)
    }

    async fn total_size(&self, filter: &FileFilter) -> AppResult<i64> {
        let state = self.state.lock().await;
        let now = Utc::now();
        Ok(state
            .files
            .iter()
            .filter(|f| filter.matches(f, now))
            .map(|f| f.file_size)
            .sum())
    }

    async fn count_by_type(&self, filter: &FileFilter) -> AppResult<Vec<(String, u64)>> {
        let state = self.state.lock().await;
        let now = Utc::now();
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for file in state.files.iter().filter(|f| filter.matches(f, now)) {
            *counts.entry(file.file_type.clone()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn record(&self, entry: &CreateActivityEvent) -> AppResult<ActivityEvent> {
        let mut state = self.state.lock().await;
        let event = ActivityEvent {
            id: Uuid::new_v4(),
            actor_id: entry.actor_id,
            action: entry.action.clone(),
            target_type: entry.target_type.clone(),
            target_id: entry.target_id,
            details: entry.details.clone(),
            created_at: Utc::now(),
        };
        state.activity.push(event.clone());
        Ok(event)
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<ActivityEvent>> {
        let state = self.state.lock().await;
        let mut events = state.activity.clone();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        events.truncate(limit as usize);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivio_core::types::SortOrder;
    use archivio_entity::file::SortBy;

    fn seeded_file(n: u128, name: &str, dept: &str, deleted: bool) -> StoredFile {
        StoredFile {
            id: Uuid::from_u128(n),
            filename: format!("{n}.pdf"),
            original_name: name.to_string(),
            file_type: "pdf".to_string(),
            file_size: (n as i64) * 10,
            file_path: format!("/uploads/{n}.pdf"),
            uploaded_by: None,
            department: Some(dept.to_string()),
            category: None,
            description: None,
            status: FileStatus::Approved,
            created_at: Some(Utc::now()),
            is_deleted: deleted,
        }
    }

    async fn store_with_files(count: u128) -> MemoryStore {
        let store = MemoryStore::new();
        for n in 1..=count {
            store
                .insert_file_raw(seeded_file(n, &format!("file-{n:03}.pdf"), "HR", false))
                .await;
        }
        store
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_are_invisible_everywhere() {
        let store = MemoryStore::new();
        store.insert_file_raw(seeded_file(1, "alive.pdf", "HR", false)).await;
        store.insert_file_raw(seeded_file(2, "gone.pdf", "HR", true)).await;

        let filter = FileFilter::default();
        let page = FileStore::query(&store, &filter, FileSort::default(), &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].original_name, "alive.pdf");

        assert_eq!(FileStore::count(&store, &filter).await.unwrap(), 1);
        assert_eq!(store.total_size(&filter).await.unwrap(), 10);
        assert!(
            FileStore::find_by_id(&store, Uuid::from_u128(2))
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.count_by_type(&filter).await.unwrap(), vec![("pdf".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_pages_partition_the_filtered_set() {
        let store = store_with_files(25).await;
        let filter = FileFilter::default();
        let sort = FileSort::new(SortBy::Name, SortOrder::Asc);

        let mut seen = Vec::new();
        let first = store
            .query(&filter, sort, &PageRequest::new(1, 7))
            .await
            .unwrap();
        assert_eq!(first.total, 25);
        assert_eq!(first.total_pages, 4);

        for page_number in 1..=first.total_pages {
            let page = store
                .query(&filter, sort, &PageRequest::new(page_number, 7))
                .await
                .unwrap();
            assert_eq!(page.total, 25);
            seen.extend(page.data.into_iter().map(|f| f.id));
        }

        // Every row appears exactly once across the pages.
        assert_eq!(seen.len(), 25);
        let mut deduped = seen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 25);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty_not_an_error() {
        let store = store_with_files(3).await;
        let page = store
            .query(
                &FileFilter::default(),
                FileSort::default(),
                &PageRequest::new(9, 10),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_queries_return_identical_order() {
        let store = MemoryStore::new();
        // All rows share a name so ordering falls back to the id tie-break.
        for n in [7u128, 3, 9, 1, 5] {
            store.insert_file_raw(seeded_file(n, "same.pdf", "HR", false)).await;
        }
        let sort = FileSort::new(SortBy::Name, SortOrder::Desc);
        let request = PageRequest::new(1, 10);

        let first = store
            .query(&FileFilter::default(), sort, &request)
            .await
            .unwrap();
        let second = store
            .query(&FileFilter::default(), sort, &request)
            .await
            .unwrap();

        let first_ids: Vec<Uuid> = first.data.iter().map(|f| f.id).collect();
        let second_ids: Vec<Uuid> = second.data.iter().map(|f| f.id).collect();
        assert_eq!(first_ids, second_ids);

        let mut expected: Vec<Uuid> = [7u128, 3, 9, 1, 5].iter().map(|n| Uuid::from_u128(*n)).collect();
        expected.sort();
        assert_eq!(first_ids, expected);
    }

    #[tokio::test]
    async fn test_department_filter_narrowing() {
        let store = MemoryStore::new();
        store.insert_file_raw(seeded_file(1, "a.pdf", "HR", false)).await;
        store.insert_file_raw(seeded_file(2, "b.pdf", "IT", false)).await;
        store.insert_file_raw(seeded_file(3, "c.pdf", "HR", false)).await;

        let filter = FileFilter::default().scoped_to_department("HR");
        let page = store
            .query(&filter, FileSort::default(), &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.data.iter().all(|f| f.department.as_deref() == Some("HR")));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let store = MemoryStore::new();
        let data = CreateUser {
            username: "jdoe".to_string(),
            email: "jdoe@example.org".to_string(),
            password_hash: "hash".to_string(),
            role: archivio_entity::user::UserRole::User,
            department: Some("HR".to_string()),
            first_name: "Jean".to_string(),
            last_name: "Doe".to_string(),
        };
        UserStore::create(&store, &data).await.unwrap();

        let mut again = data.clone();
        again.email = "other@example.org".to_string();
        let err = UserStore::create(&store, &again).await.unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Conflict);
    }
}
