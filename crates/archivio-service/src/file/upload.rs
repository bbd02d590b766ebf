//! Server-side upload handling: validation, persistence, cleanup.
//!
//! The payload is written to disk before the record is inserted; if the
//! insert fails, the payload is removed again so a failed upload leaves
//! no orphaned artifact behind.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use archivio_auth::policy;
use archivio_core::config::storage::StorageConfig;
use archivio_core::error::AppError;
use archivio_core::result::AppResult;
use archivio_database::store::{ActivityStore, FileStore, UserStore};
use archivio_entity::activity::{CreateActivityEvent, action};
use archivio_entity::file::model::extension_of;
use archivio_entity::file::{CreateStoredFile, FileStatus, StoredFile};
use archivio_entity::user::UserRole;
use archivio_storage::LocalBlobStore;

use crate::context::RequestContext;

/// One file to be uploaded, as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// The name the file was uploaded with.
    pub original_name: String,
    /// Payload bytes.
    pub data: Bytes,
    /// Target department; required unless the caller is a regular user.
    pub department: Option<String>,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

/// Handles validated uploads into blob storage and the file store.
#[derive(Clone)]
pub struct UploadService {
    files: Arc<dyn FileStore>,
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityStore>,
    blobs: LocalBlobStore,
    config: StorageConfig,
}

impl UploadService {
    /// Create a new upload service.
    pub fn new(
        files: Arc<dyn FileStore>,
        users: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityStore>,
        blobs: LocalBlobStore,
        config: StorageConfig,
    ) -> Self {
        Self {
            files,
            users,
            activity,
            blobs,
            config,
        }
    }

    /// Validate the payload against the size cap and extension allow-list.
    fn validate(&self, request: &UploadRequest) -> AppResult<String> {
        if request.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if request.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        let extension = extension_of(&request.original_name);
        if !self.config.is_extension_allowed(&extension) {
            return Err(AppError::validation(format!(
                "File type '.{extension}' is not allowed. Allowed types: {}",
                self.config.allowed_extensions.join(", ")
            )));
        }
        Ok(extension)
    }

    /// Resolve the department the file will belong to.
    ///
    /// Regular users always upload into their own department; for other
    /// roles the department field is mandatory.
    fn resolve_department(
        ctx: &RequestContext,
        requested: Option<String>,
    ) -> AppResult<Option<String>> {
        if ctx.role == UserRole::User {
            return Ok(ctx.department.clone());
        }
        match requested {
            Some(department) if !department.trim().is_empty() => Ok(Some(department)),
            _ => Err(AppError::validation("Department is required")),
        }
    }

    /// Upload one file on behalf of the caller.
    pub async fn upload(&self, ctx: &RequestContext, request: UploadRequest) -> AppResult<StoredFile> {
        // Re-load the caller so mid-session deactivation is caught.
        let caller = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::authentication("Unknown user"))?;
        if !policy::can_upload_files(Some(&policy::Principal::from(&caller))) {
            return Err(AppError::authorization("Your account may not upload files"));
        }

        let extension = self.validate(&request)?;
        let department = Self::resolve_department(ctx, request.department.clone())?;

        let status = if self.config.require_approval {
            FileStatus::Pending
        } else {
            FileStatus::Approved
        };

        let storage_name = LocalBlobStore::storage_name(&request.original_name);
        let file_path = self.blobs.write(&storage_name, &request.data).await?;

        let record = CreateStoredFile {
            filename: storage_name.clone(),
            original_name: request.original_name.clone(),
            file_type: extension,
            file_size: request.data.len() as i64,
            file_path,
            uploaded_by: Some(ctx.user_id),
            department,
            category: request.category,
            description: request.description,
            status,
        };

        let file = match self.files.create(&record).await {
            Ok(file) => file,
            Err(e) => {
                // Do not leave an orphaned payload behind a failed insert.
                let _ = self.blobs.remove(&storage_name).await;
                return Err(e);
            }
        };

        let event = CreateActivityEvent::new(ctx.user_id, action::FILE_UPLOAD, "file", Some(file.id))
            .with_details(serde_json::json!({
                "originalName": file.original_name,
                "fileSize": file.file_size,
            }));
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record upload activity");
        }

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            name = %file.original_name,
            size = file.file_size,
            "File uploaded"
        );

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivio_database::memory::MemoryStore;
    use archivio_entity::user::User;
    use chrono::Utc;
    use uuid::Uuid;

    async fn service_with_user(role: UserRole, department: Option<&str>, active: bool) -> (UploadService, RequestContext) {
        let store = MemoryStore::new();
        let user = User {
            id: Uuid::new_v4(),
            username: "uploader".to_string(),
            email: "uploader@example.org".to_string(),
            password_hash: "hash".to_string(),
            role,
            department: department.map(String::from),
            first_name: "Una".to_string(),
            last_name: "Ploader".to_string(),
            is_active: active,
            created_at: Utc::now(),
            last_login: None,
        };
        store.insert_user_raw(user.clone()).await;

        let dir = std::env::temp_dir().join(format!("archivio-upload-test-{}", Uuid::new_v4()));
        let blobs = LocalBlobStore::new(dir.to_str().unwrap()).await.unwrap();

        let service = UploadService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            blobs,
            StorageConfig::default(),
        );
        let ctx = RequestContext::new(user.id, role, user.department.clone(), user.username.clone());
        (service, ctx)
    }

    fn request(name: &str, size: usize, department: Option<&str>) -> UploadRequest {
        UploadRequest {
            original_name: name.to_string(),
            data: Bytes::from(vec![0u8; size]),
            department: department.map(String::from),
            category: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_upload_substitutes_department_for_regular_users() {
        let (service, ctx) = service_with_user(UserRole::User, Some("HR"), true).await;
        // The request asks for IT, but the caller is a regular HR user.
        let file = service
            .upload(&ctx, request("note.pdf", 64, Some("IT")))
            .await
            .unwrap();
        assert_eq!(file.department.as_deref(), Some("HR"));
        assert_eq!(file.status, FileStatus::Approved);
        assert_eq!(file.file_type, "pdf");
    }

    #[tokio::test]
    async fn test_upload_requires_department_for_admins() {
        let (service, ctx) = service_with_user(UserRole::Admin, None, true).await;
        let err = service
            .upload(&ctx, request("note.pdf", 64, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_oversized_payload_is_rejected() {
        let (service, ctx) = service_with_user(UserRole::User, Some("HR"), true).await;
        let too_big = 10 * 1024 * 1024 + 1;
        let err = service
            .upload(&ctx, request("big.pdf", too_big, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Validation);
        assert!(err.message.contains("maximum upload size"));
    }

    #[tokio::test]
    async fn test_disallowed_extension_is_rejected() {
        let (service, ctx) = service_with_user(UserRole::User, Some("HR"), true).await;
        let err = service
            .upload(&ctx, request("malware.exe", 64, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Validation);
        assert!(err.message.contains(".exe"));
    }

    #[tokio::test]
    async fn test_inactive_account_may_not_upload() {
        let (service, ctx) = service_with_user(UserRole::User, Some("HR"), false).await;
        let err = service
            .upload(&ctx, request("note.pdf", 64, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Authorization);
    }
}
