//! File handlers: listing, upload, download, review, deletion.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;

use archivio_core::error::AppError;
use archivio_core::types::Page;
use archivio_entity::file::{FileSort, StoredFile};
use archivio_service::file::{FileListing, FileWithUploader, UploadRequest};

use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ListFilesQuery, PaginationParams};
use crate::state::AppState;

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<FileListing>, ApiError> {
    let params = query.into_params()?;
    let listing = state.query_engine.list(&auth, params).await?;
    Ok(Json(listing))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredFile>, ApiError> {
    let file = state.file_service.get_file(&auth, id).await?;
    Ok(Json(file))
}

/// GET /api/files/user/{userId}
pub async fn list_user_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<FileWithUploader>>, ApiError> {
    let page = params.into_page_request(12)?;
    let result = state
        .file_service
        .list_user_files(&auth, user_id, FileSort::default(), &page)
        .await?;
    Ok(Json(result))
}

/// POST /api/files — multipart upload of one file.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<StoredFile>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;
    let mut department: Option<String> = None;
    let mut category: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(String::from);
                data = Some(field.bytes().await.map_err(|e| {
                    AppError::validation(format!("Failed to read file field: {e}"))
                })?);
            }
            "department" => {
                department = Some(read_text(field).await?).filter(|v| !v.is_empty());
            }
            "category" => {
                category = Some(read_text(field).await?).filter(|v| !v.is_empty());
            }
            "description" => {
                description = Some(read_text(field).await?).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let original_name = file_name.ok_or_else(|| AppError::validation("No file provided"))?;
    let data = data.ok_or_else(|| AppError::validation("No file provided"))?;

    let file = state
        .upload_service
        .upload(
            &auth,
            UploadRequest {
                original_name,
                data,
                department,
                category,
                description,
            },
        )
        .await?;

    Ok(Json(file))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Failed to read field: {e}")))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let payload = state.file_service.download(&auth, id).await?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, payload.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", payload.file_name),
        )
        .header(header::CONTENT_LENGTH, payload.size)
        .body(Body::from_stream(payload.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.file_service.delete_file(&auth, id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

/// PATCH /api/files/{id}/approve
pub async fn approve_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredFile>, ApiError> {
    let file = state.file_service.approve_file(&auth, id).await?;
    Ok(Json(file))
}

/// PATCH /api/files/{id}/reject
pub async fn reject_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredFile>, ApiError> {
    let file = state.file_service.reject_file(&auth, id).await?;
    Ok(Json(file))
}
