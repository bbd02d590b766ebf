//! Department management handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;
use validator::Validate;

use archivio_core::error::AppError;
use archivio_entity::department::{
    CreateDepartment, Department, DepartmentWithCounts, UpdateDepartment,
};

use crate::dto::request::{CreateDepartmentRequest, UpdateDepartmentRequest};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<DepartmentWithCounts>>, ApiError> {
    let departments = state.department_service.list_with_counts().await?;
    Ok(Json(departments))
}

/// POST /api/departments
pub async fn create_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<Json<Department>, ApiError> {
    request
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid department data: {e}")))?;

    let department = state
        .department_service
        .create(
            &auth,
            CreateDepartment {
                name: request.name,
                description: request.description,
            },
        )
        .await?;
    Ok(Json(department))
}

/// PUT /api/departments/{id}
pub async fn update_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDepartmentRequest>,
) -> Result<Json<Department>, ApiError> {
    request
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid department data: {e}")))?;

    let department = state
        .department_service
        .update(
            &auth,
            id,
            UpdateDepartment {
                name: request.name,
                description: request.description,
            },
        )
        .await?;
    Ok(Json(department))
}

/// DELETE /api/departments/{id}
pub async fn delete_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.department_service.delete(&auth, id).await?;
    Ok(Json(MessageResponse::new("Department deleted successfully")))
}
