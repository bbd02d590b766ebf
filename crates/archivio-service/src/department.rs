//! Department management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use archivio_auth::policy;
use archivio_core::error::AppError;
use archivio_core::result::AppResult;
use archivio_database::store::{ActivityStore, DepartmentStore, FileStore, UserStore};
use archivio_entity::activity::{CreateActivityEvent, action};
use archivio_entity::department::{
    CreateDepartment, Department, DepartmentWithCounts, UpdateDepartment,
};
use archivio_entity::file::FileFilter;

use crate::context::RequestContext;

/// Department CRUD with derived counts and strict deletion.
#[derive(Clone)]
pub struct DepartmentService {
    departments: Arc<dyn DepartmentStore>,
    users: Arc<dyn UserStore>,
    files: Arc<dyn FileStore>,
    activity: Arc<dyn ActivityStore>,
}

impl DepartmentService {
    /// Create a new department service.
    pub fn new(
        departments: Arc<dyn DepartmentStore>,
        users: Arc<dyn UserStore>,
        files: Arc<dyn FileStore>,
        activity: Arc<dyn ActivityStore>,
    ) -> Self {
        Self {
            departments,
            users,
            files,
            activity,
        }
    }

    /// List every department with its derived user and file counts.
    ///
    /// Available to any authenticated caller; the upload form needs the
    /// department list regardless of role.
    pub async fn list_with_counts(&self) -> AppResult<Vec<DepartmentWithCounts>> {
        let departments = self.departments.list_all().await?;
        let mut result = Vec::with_capacity(departments.len());
        for department in departments {
            let user_count = self.users.count_by_department(&department.name).await?;
            let file_count = self
                .files
                .count(&FileFilter::default().scoped_to_department(&department.name))
                .await?;
            result.push(DepartmentWithCounts {
                department,
                user_count,
                file_count,
            });
        }
        Ok(result)
    }

    /// Create a department. Elevated roles only.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        data: CreateDepartment,
    ) -> AppResult<Department> {
        self.require_manager(ctx)?;
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Department name cannot be empty"));
        }

        let department = self.departments.create(&data).await?;

        let event = CreateActivityEvent::new(
            ctx.user_id,
            action::DEPARTMENT_CREATE,
            "department",
            Some(department.id),
        );
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record department creation activity");
        }

        info!(user_id = %ctx.user_id, department = %department.name, "Department created");
        Ok(department)
    }

    /// Update a department. Elevated roles only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: UpdateDepartment,
    ) -> AppResult<Department> {
        self.require_manager(ctx)?;
        self.departments
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("Department not found"))
    }

    /// Delete a department. Elevated roles only.
    ///
    /// Refused with a Conflict while any user or live file still
    /// references the department, so rows are never orphaned.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.require_manager(ctx)?;

        let department = self
            .departments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Department not found"))?;

        let user_count = self.users.count_by_department(&department.name).await?;
        if user_count > 0 {
            return Err(AppError::conflict(format!(
                "Department '{}' still has {user_count} user(s) assigned",
                department.name
            )));
        }
        let file_count = self
            .files
            .count(&FileFilter::default().scoped_to_department(&department.name))
            .await?;
        if file_count > 0 {
            return Err(AppError::conflict(format!(
                "Department '{}' still has {file_count} file(s)",
                department.name
            )));
        }

        if !self.departments.delete(id).await? {
            return Err(AppError::not_found("Department not found"));
        }

        let event = CreateActivityEvent::new(
            ctx.user_id,
            action::DEPARTMENT_DELETE,
            "department",
            Some(id),
        );
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record department deletion activity");
        }

        info!(user_id = %ctx.user_id, department = %department.name, "Department deleted");
        Ok(())
    }

    fn require_manager(&self, ctx: &RequestContext) -> AppResult<()> {
        if policy::can_manage_departments(Some(&ctx.principal())) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Only administrators may manage departments",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivio_database::memory::MemoryStore;
    use archivio_entity::file::{FileStatus, StoredFile};
    use archivio_entity::user::{User, UserRole};
    use chrono::Utc;

    fn service(store: &MemoryStore) -> DepartmentService {
        DepartmentService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    fn admin_ctx() -> RequestContext {
        RequestContext::new(Uuid::new_v4(), UserRole::Admin, None, "admin".to_string())
    }

    #[tokio::test]
    async fn test_counts_include_only_live_files() {
        let store = MemoryStore::new();
        let svc = service(&store);
        svc.create(
            &admin_ctx(),
            CreateDepartment {
                name: "HR".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        store
            .insert_user_raw(User {
                id: Uuid::new_v4(),
                username: "hr1".to_string(),
                email: "hr1@example.org".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
                department: Some("HR".to_string()),
                first_name: "H".to_string(),
                last_name: "R".to_string(),
                is_active: true,
                created_at: Utc::now(),
                last_login: None,
            })
            .await;
        for (n, deleted) in [(1u128, false), (2, true)] {
            store
                .insert_file_raw(StoredFile {
                    id: Uuid::from_u128(n),
                    filename: format!("{n}.pdf"),
                    original_name: format!("{n}.pdf"),
                    file_type: "pdf".to_string(),
                    file_size: 1,
                    file_path: format!("/uploads/{n}.pdf"),
                    uploaded_by: None,
                    department: Some("HR".to_string()),
                    category: None,
                    description: None,
                    status: FileStatus::Approved,
                    created_at: Some(Utc::now()),
                    is_deleted: deleted,
                })
                .await;
        }

        let listed = svc.list_with_counts().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_count, 1);
        assert_eq!(listed[0].file_count, 1);
    }

    #[tokio::test]
    async fn test_delete_refused_while_referenced() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let department = svc
            .create(
                &admin_ctx(),
                CreateDepartment {
                    name: "IT".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        store
            .insert_user_raw(User {
                id: Uuid::new_v4(),
                username: "it1".to_string(),
                email: "it1@example.org".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
                department: Some("IT".to_string()),
                first_name: "I".to_string(),
                last_name: "T".to_string(),
                is_active: true,
                created_at: Utc::now(),
                last_login: None,
            })
            .await;

        let err = svc.delete(&admin_ctx(), department.id).await.unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Conflict);

        // Remove the user; deletion now succeeds.
        let users: Vec<_> = store.list(&archivio_core::types::PageRequest::default()).await.unwrap().data;
        UserStore::delete(&store, users[0].id).await.unwrap();
        svc.delete(&admin_ctx(), department.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_management_requires_elevated_role() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let ctx = RequestContext::new(
            Uuid::new_v4(),
            UserRole::User,
            Some("HR".to_string()),
            "user".to_string(),
        );
        let err = svc
            .create(
                &ctx,
                CreateDepartment {
                    name: "Legal".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Authorization);
    }
}
