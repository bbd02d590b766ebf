//! Authentication handlers: login, logout, token validation.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use archivio_core::error::AppError;

use crate::dto::request::LoginRequest;
use crate::dto::response::{LoginResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid login request: {e}")))?;

    let outcome = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        user: UserResponse::from(outcome.user),
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; logout is a client-side discard.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

/// GET /api/auth/validate
pub async fn validate(auth: AuthUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "valid": true,
        "user": {
            "id": auth.user_id,
            "username": auth.username,
            "role": auth.role,
            "department": auth.department,
        }
    }))
}
