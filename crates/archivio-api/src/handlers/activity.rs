//! Activity feed handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use archivio_entity::activity::ActivityEvent;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Query parameters for the activity feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    /// Maximum number of entries to return.
    pub limit: Option<String>,
}

/// GET /api/activities
pub async fn recent_activity(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEvent>>, ApiError> {
    let limit = crate::extractors::pagination::parse_positive("limit", query.limit.as_deref())?;
    let events = state.activity_service.recent(limit).await?;
    Ok(Json(events))
}
