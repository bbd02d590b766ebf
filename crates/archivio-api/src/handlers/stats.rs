//! Statistics handler.

use axum::Json;
use axum::extract::State;

use archivio_service::stats::Stats;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/stats
pub async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Stats>, ApiError> {
    let stats = state.stats_service.aggregate(&auth).await?;
    Ok(Json(stats))
}
