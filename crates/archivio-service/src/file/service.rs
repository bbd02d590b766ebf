//! File lifecycle operations with access policy enforcement.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use archivio_auth::policy;
use archivio_core::error::AppError;
use archivio_core::result::AppResult;
use archivio_core::types::{Page, PageRequest};
use archivio_database::store::{ActivityStore, FileStore};
use archivio_entity::activity::{CreateActivityEvent, action};
use archivio_entity::file::{FileSort, FileStatus, StoredFile};
use archivio_storage::local::BlobStream;
use archivio_storage::{LocalBlobStore, mime};

use crate::context::RequestContext;
use crate::file::query::{FileQueryEngine, FileWithUploader};

/// A payload ready to be streamed to the client.
pub struct DownloadPayload {
    /// Byte stream of the payload.
    pub stream: BlobStream,
    /// MIME type inferred from the display name.
    pub content_type: String,
    /// Name the client should save the file as.
    pub file_name: String,
    /// Payload size in bytes.
    pub size: i64,
}

/// File retrieval, download, approval, and deletion.
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    activity: Arc<dyn ActivityStore>,
    query_engine: FileQueryEngine,
    blobs: LocalBlobStore,
}

impl FileService {
    /// Create a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        activity: Arc<dyn ActivityStore>,
        query_engine: FileQueryEngine,
        blobs: LocalBlobStore,
    ) -> Self {
        Self {
            files,
            activity,
            query_engine,
            blobs,
        }
    }

    /// Load a file the caller is allowed to read.
    pub async fn get_file(&self, ctx: &RequestContext, id: Uuid) -> AppResult<StoredFile> {
        let file = self
            .files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if !policy::can_access_file(Some(&ctx.principal()), &file) {
            return Err(AppError::authorization(
                "You do not have access to this file",
            ));
        }
        Ok(file)
    }

    /// Open a file's payload for download.
    pub async fn download(&self, ctx: &RequestContext, id: Uuid) -> AppResult<DownloadPayload> {
        let file = self.get_file(ctx, id).await?;
        let stream = self.blobs.read_stream(&file.filename).await?;
        Ok(DownloadPayload {
            stream,
            content_type: mime::content_type_for(&file.original_name),
            file_name: file.original_name,
            size: file.file_size,
        })
    }

    /// Soft-delete a file and remove its payload.
    ///
    /// Regular users may delete only their own uploads; elevated roles may
    /// delete anything. The record is flagged first; payload removal is a
    /// side effect and its failure does not resurrect the record.
    pub async fn delete_file(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let file = self
            .files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if !policy::can_delete_file(Some(&ctx.principal()), &file) {
            return Err(AppError::authorization(
                "You do not have permission to delete this file",
            ));
        }

        if !self.files.soft_delete(id).await? {
            return Err(AppError::not_found("File not found"));
        }

        if let Err(e) = self.blobs.remove(&file.filename).await {
            tracing::warn!(file_id = %id, error = %e, "Failed to remove payload for deleted file");
        }

        let event = CreateActivityEvent::new(ctx.user_id, action::FILE_DELETE, "file", Some(id));
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record delete activity");
        }

        info!(user_id = %ctx.user_id, file_id = %id, "File deleted");
        Ok(())
    }

    /// Approve a pending file. Elevated roles only.
    pub async fn approve_file(&self, ctx: &RequestContext, id: Uuid) -> AppResult<StoredFile> {
        self.transition_status(ctx, id, FileStatus::Approved, action::FILE_APPROVE)
            .await
    }

    /// Reject a pending file. Elevated roles only.
    pub async fn reject_file(&self, ctx: &RequestContext, id: Uuid) -> AppResult<StoredFile> {
        self.transition_status(ctx, id, FileStatus::Rejected, action::FILE_REJECT)
            .await
    }

    async fn transition_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: FileStatus,
        action_name: &str,
    ) -> AppResult<StoredFile> {
        if !ctx.is_elevated() {
            return Err(AppError::authorization(
                "Only administrators may review files",
            ));
        }

        let file = self
            .files
            .set_status(id, status)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let event = CreateActivityEvent::new(ctx.user_id, action_name, "file", Some(id));
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record review activity");
        }

        info!(user_id = %ctx.user_id, file_id = %id, status = %status, "File reviewed");
        Ok(file)
    }

    /// List the files uploaded by `owner_id`.
    ///
    /// Callers may list their own files; elevated roles may list anyone's.
    pub async fn list_user_files(
        &self,
        ctx: &RequestContext,
        owner_id: Uuid,
        sort: FileSort,
        page: &PageRequest,
    ) -> AppResult<Page<FileWithUploader>> {
        if !policy::can_view_user_files(Some(&ctx.principal()), owner_id) {
            return Err(AppError::authorization(
                "You may only list your own files",
            ));
        }
        self.query_engine.list_by_owner(owner_id, sort, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivio_database::memory::MemoryStore;
    use archivio_database::store::FileStore as _;
    use archivio_entity::file::FileFilter;
    use archivio_entity::user::UserRole;
    use chrono::Utc;

    fn ctx(role: UserRole, department: Option<&str>) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            role,
            department.map(String::from),
            "caller".to_string(),
        )
    }

    fn seeded_file(n: u128, dept: &str, owner: Option<Uuid>) -> StoredFile {
        StoredFile {
            id: Uuid::from_u128(n),
            filename: format!("{n}.pdf"),
            original_name: format!("doc-{n}.pdf"),
            file_type: "pdf".to_string(),
            file_size: 100,
            file_path: format!("/uploads/{n}.pdf"),
            uploaded_by: owner,
            department: Some(dept.to_string()),
            category: None,
            description: None,
            status: FileStatus::Pending,
            created_at: Some(Utc::now()),
            is_deleted: false,
        }
    }

    async fn service(store: &MemoryStore) -> FileService {
        let dir = std::env::temp_dir().join(format!("archivio-filesvc-test-{}", Uuid::new_v4()));
        let blobs = LocalBlobStore::new(dir.to_str().unwrap()).await.unwrap();
        let engine = FileQueryEngine::new(Arc::new(store.clone()), Arc::new(store.clone()));
        FileService::new(Arc::new(store.clone()), Arc::new(store.clone()), engine, blobs)
    }

    #[tokio::test]
    async fn test_regular_user_cannot_delete_foreign_file() {
        let store = MemoryStore::new();
        store
            .insert_file_raw(seeded_file(1, "HR", Some(Uuid::from_u128(42))))
            .await;
        let svc = service(&store).await;

        let err = svc
            .delete_file(&ctx(UserRole::User, Some("HR")), Uuid::from_u128(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_owner_can_delete_and_row_disappears() {
        let store = MemoryStore::new();
        let owner = ctx(UserRole::User, Some("HR"));
        store
            .insert_file_raw(seeded_file(1, "HR", Some(owner.user_id)))
            .await;
        let svc = service(&store).await;

        svc.delete_file(&owner, Uuid::from_u128(1)).await.unwrap();
        assert_eq!(store.count(&FileFilter::default()).await.unwrap(), 0);

        // A second delete sees nothing.
        let err = svc.delete_file(&owner, Uuid::from_u128(1)).await.unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_approval_is_admin_only_and_transitions_status() {
        let store = MemoryStore::new();
        store.insert_file_raw(seeded_file(1, "HR", None)).await;
        let svc = service(&store).await;

        let err = svc
            .approve_file(&ctx(UserRole::User, Some("HR")), Uuid::from_u128(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Authorization);

        let approved = svc
            .approve_file(&ctx(UserRole::Admin, None), Uuid::from_u128(1))
            .await
            .unwrap();
        assert_eq!(approved.status, FileStatus::Approved);
    }

    #[tokio::test]
    async fn test_access_check_on_get_file() {
        let store = MemoryStore::new();
        store.insert_file_raw(seeded_file(1, "IT", None)).await;
        let svc = service(&store).await;

        let err = svc
            .get_file(&ctx(UserRole::User, Some("HR")), Uuid::from_u128(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Authorization);

        assert!(
            svc.get_file(&ctx(UserRole::Superuser, None), Uuid::from_u128(1))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_list_user_files_is_self_or_admin() {
        let store = MemoryStore::new();
        let owner = ctx(UserRole::User, Some("HR"));
        store
            .insert_file_raw(seeded_file(1, "HR", Some(owner.user_id)))
            .await;
        let svc = service(&store).await;

        let own = svc
            .list_user_files(&owner, owner.user_id, FileSort::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(own.total, 1);

        let stranger = ctx(UserRole::User, Some("HR"));
        let err = svc
            .list_user_files(&stranger, owner.user_id, FileSort::default(), &PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Authorization);
    }
}
