//! Department store implementation on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use archivio_core::error::{AppError, ErrorKind};
use archivio_core::result::AppResult;
use archivio_entity::department::{CreateDepartment, Department, UpdateDepartment};

use crate::store::DepartmentStore;

/// Department repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgDepartmentStore {
    pool: PgPool,
}

impl PgDepartmentStore {
    /// Create a new department store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentStore for PgDepartmentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find department", e)
            })
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find department by name", e)
            })
    }

    async fn create(&self, data: &CreateDepartment) -> AppResult<Department> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("departments_name_key") =>
            {
                AppError::conflict(format!("Department '{}' already exists", data.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create department", e),
        })
    }

    async fn update(&self, id: Uuid, patch: &UpdateDepartment) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = COALESCE($2, name), \
             description = COALESCE($3, description) WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("departments_name_key") =>
            {
                AppError::conflict("Another department already uses that name")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update department", e),
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete department", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> AppResult<Vec<Department>> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list departments", e)
            })
    }

    async fn count_all(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count departments", e)
            })?;
        Ok(count as u64)
    }
}
