//! Activity log store implementation on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use archivio_core::error::{AppError, ErrorKind};
use archivio_core::result::AppResult;
use archivio_entity::activity::{ActivityEvent, CreateActivityEvent};

use crate::store::ActivityStore;

/// Activity log repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgActivityStore {
    pool: PgPool,
}

impl PgActivityStore {
    /// Create a new activity store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for PgActivityStore {
    async fn record(&self, entry: &CreateActivityEvent) -> AppResult<ActivityEvent> {
        sqlx::query_as::<_, ActivityEvent>(
            "INSERT INTO activity_log (actor_id, action, target_type, target_id, details) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(entry.actor_id)
        .bind(&entry.action)
        .bind(&entry.target_type)
        .bind(entry.target_id)
        .bind(&entry.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record activity", e))
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<ActivityEvent>> {
        sqlx::query_as::<_, ActivityEvent>(
            "SELECT * FROM activity_log ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activity", e))
    }
}
