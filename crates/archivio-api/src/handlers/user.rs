//! User management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use archivio_core::error::AppError;
use archivio_core::types::Page;
use archivio_entity::user::UserRole;
use archivio_service::user::NewUserParams;

use crate::dto::request::CreateUserRequest;
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let page = params.into_page_request(10)?;
    let users = state.user_service.list_users(&auth, &page).await?;
    Ok(Json(users.map(UserResponse::from)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid user data: {e}")))?;

    let role: UserRole = request.role.parse()?;
    let user = state
        .user_service
        .create_user(
            &auth,
            NewUserParams {
                username: request.username,
                email: request.email,
                password: request.password,
                role,
                department: request.department,
                first_name: request.first_name,
                last_name: request.last_name,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.user_service.delete_user(&auth, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
