//! File store implementation on PostgreSQL.
//!
//! The filtered query mirrors [`FileFilter::matches`] clause for clause,
//! and orders with an explicit `id` tie-break so repeated queries paginate
//! identically.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use archivio_core::error::{AppError, ErrorKind};
use archivio_core::result::AppResult;
use archivio_core::types::{Page, PageRequest, SortOrder};
use archivio_entity::file::{CreateStoredFile, FileFilter, FileSort, FileStatus, SortBy, StoredFile};

use crate::store::FileStore;

/// File repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

/// Owned bind values for a filtered query, in parameter order.
struct FilterBinds {
    search_pattern: Option<String>,
    department: Option<String>,
    file_type: Option<String>,
    cutoff: Option<DateTime<Utc>>,
    status: Option<FileStatus>,
    uploaded_by: Option<Uuid>,
}

impl PgFileStore {
    /// Create a new file store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the WHERE clause and bind values for a filter.
    ///
    /// Soft-deleted rows are excluded unconditionally, before any other
    /// criterion.
    fn where_clause(filter: &FileFilter) -> (String, FilterBinds) {
        let mut conditions = vec!["is_deleted = FALSE".to_string()];
        let mut param_idx = 1u32;

        let search_pattern = filter.search.as_ref().map(|s| format!("%{s}%"));
        if search_pattern.is_some() {
            conditions.push(format!(
                "(original_name ILIKE ${param_idx} OR description ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }
        if filter.department.is_some() {
            conditions.push(format!("department = ${param_idx}"));
            param_idx += 1;
        }
        if filter.file_type.is_some() {
            conditions.push(format!("file_type = ${param_idx}"));
            param_idx += 1;
        }
        let cutoff = filter
            .date_range_days
            .map(|days| Utc::now() - Duration::days(days));
        if cutoff.is_some() {
            conditions.push(format!(
                "created_at IS NOT NULL AND created_at >= ${param_idx}"
            ));
            param_idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.uploaded_by.is_some() {
            conditions.push(format!("uploaded_by = ${param_idx}"));
        }

        let clause = format!("WHERE {}", conditions.join(" AND "));
        let binds = FilterBinds {
            search_pattern,
            department: filter.department.clone(),
            file_type: filter.file_type.clone(),
            cutoff,
            status: filter.status,
            uploaded_by: filter.uploaded_by,
        };
        (clause, binds)
    }

    /// Number of bound parameters produced by `where_clause`.
    fn bind_count(binds: &FilterBinds) -> u32 {
        [
            binds.search_pattern.is_some(),
            binds.department.is_some(),
            binds.file_type.is_some(),
            binds.cutoff.is_some(),
            binds.status.is_some(),
            binds.uploaded_by.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count() as u32
    }

    /// ORDER BY clause for a sort specification.
    ///
    /// `created_at` is nullable; NULLS FIRST on ascending (and LAST on
    /// descending) matches the `Option` ordering of the in-memory store.
    fn order_clause(sort: FileSort) -> String {
        match (sort.by, sort.order) {
            (SortBy::Date, SortOrder::Asc) => {
                "ORDER BY created_at ASC NULLS FIRST, id ASC".to_string()
            }
            (SortBy::Date, SortOrder::Desc) => {
                "ORDER BY created_at DESC NULLS LAST, id ASC".to_string()
            }
            (by, order) => format!("ORDER BY {} {}, id ASC", by.as_sql(), order.as_sql()),
        }
    }
}

macro_rules! bind_filter {
    ($query:expr, $binds:expr) => {{
        let mut query = $query;
        if let Some(pattern) = &$binds.search_pattern {
            query = query.bind(pattern.clone());
        }
        if let Some(department) = &$binds.department {
            query = query.bind(department.clone());
        }
        if let Some(file_type) = &$binds.file_type {
            query = query.bind(file_type.clone());
        }
        if let Some(cutoff) = $binds.cutoff {
            query = query.bind(cutoff);
        }
        if let Some(status) = $binds.status {
            query = query.bind(status);
        }
        if let Some(uploaded_by) = $binds.uploaded_by {
            query = query.bind(uploaded_by);
        }
        query
    }};
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StoredFile>> {
        sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = $1 AND is_deleted = FALSE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn create(&self, data: &CreateStoredFile) -> AppResult<StoredFile> {
        sqlx::query_as::<_, StoredFile>(
            "INSERT INTO files \
             (filename, original_name, file_type, file_size, file_path, uploaded_by, department, category, description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(&data.filename)
        .bind(&data.original_name)
        .bind(&data.file_type)
        .bind(data.file_size)
        .bind(&data.file_path)
        .bind(data.uploaded_by)
        .bind(&data.department)
        .bind(&data.category)
        .bind(&data.description)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn set_status(&self, id: Uuid, status: FileStatus) -> AppResult<Option<StoredFile>> {
        sqlx::query_as::<_, StoredFile>(
            "UPDATE files SET status = $2 WHERE id = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file status", e))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE files SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete file", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn query(
        &self,
        filter: &FileFilter,
        sort: FileSort,
        page: &PageRequest,
    ) -> AppResult<Page<StoredFile>> {
        let (where_clause, binds) = Self::where_clause(filter);
        let order_clause = Self::order_clause(sort);
        let next_param = Self::bind_count(&binds) + 1;

        let count_sql = format!("SELECT COUNT(*) FROM files {where_clause}");
        let select_sql = format!(
            "SELECT * FROM files {where_clause} {order_clause} LIMIT ${next_param} OFFSET ${}",
            next_param + 1
        );

        let total: i64 = bind_filter!(sqlx::query_scalar(&count_sql), binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;

        let files = bind_filter!(sqlx::query_as::<_, StoredFile>(&select_sql), binds)
            .bind(page.limit as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query files", e))?;

        Ok(Page::new(files, page, total as u64))
    }

    async fn count(&self, filter: &FileFilter) -> AppResult<u64> {
        let (where_clause, binds) = Self::where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM files {where_clause}");

        let count: i64 = bind_filter!(sqlx::query_scalar(&sql), binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        Ok(count as u64)
    }

    async fn total_size(&self, filter: &FileFilter) -> AppResult<i64> {
        let (where_clause, binds) = Self::where_clause(filter);
        let sql = format!("SELECT COALESCE(SUM(file_size), 0) FROM files {where_clause}");

        bind_filter!(sqlx::query_scalar(&sql), binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum file sizes", e))
    }

    async fn count_by_type(&self, filter: &FileFilter) -> AppResult<Vec<(String, u64)>> {
        let (where_clause, binds) = Self::where_clause(filter);
        let sql = format!(
            "SELECT file_type, COUNT(*) FROM files {where_clause} \
             GROUP BY file_type ORDER BY file_type ASC"
        );

        let rows: Vec<(String, i64)> = bind_filter!(sqlx::query_as(&sql), binds)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to group files by type", e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(file_type, count)| (file_type, count as u64))
            .collect())
    }
}
