//! Batch orchestration over a set of upload tasks.
//!
//! Selection-time validation moves invalid files straight to `Error` and
//! keeps them visible; duplicates (same name and size as an already
//! selected file) are dropped with a notice. Submission walks the pending
//! tasks sequentially; outcomes are independent per task.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use archivio_core::error::AppError;
use archivio_core::result::AppResult;
use archivio_entity::file::model::extension_of;
use archivio_entity::user::UserRole;

use crate::task::{CANCELLED_MESSAGE, PayloadSource, TaskStatus, UploadTask};
use crate::transport::{FileTransport, TransferRequest};

/// Selection-time validation rules for a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum payload size in bytes.
    pub max_size_bytes: u64,
    /// Accepted extensions (lowercase, no leading dot).
    pub allowed_extensions: Vec<String>,
    /// Maximum number of files in one batch.
    pub max_files: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: ["pdf", "doc", "docx", "xls", "xlsx", "png", "jpg", "jpeg", "gif"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_files: 10,
        }
    }
}

/// Metadata shared by every file in a batch.
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    /// Target department.
    pub department: Option<String>,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

impl UploadMetadata {
    /// Enforce the department rule for the caller's role.
    ///
    /// Regular users always upload into their own department; for every
    /// other role the department must be chosen explicitly.
    pub fn resolved_for(mut self, role: UserRole, own_department: Option<&str>) -> AppResult<Self> {
        if role == UserRole::User {
            self.department = own_department.map(String::from);
            return Ok(self);
        }
        match self.department.as_deref() {
            Some(department) if !department.trim().is_empty() => Ok(self),
            _ => Err(AppError::validation("Department is required")),
        }
    }
}

/// Aggregate result of one batch submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Tasks that reached `Done`.
    pub success_count: usize,
    /// Tasks that reached `Error` during submission.
    pub error_count: usize,
}

/// Classification of a batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every submitted file succeeded.
    FullSuccess,
    /// Some files succeeded, some failed.
    PartialSuccess,
    /// No file succeeded.
    FullFailure,
}

impl BatchReport {
    /// Classify this report.
    pub fn outcome(&self) -> BatchOutcome {
        if self.success_count > 0 && self.error_count == 0 {
            BatchOutcome::FullSuccess
        } else if self.success_count > 0 {
            BatchOutcome::PartialSuccess
        } else {
            BatchOutcome::FullFailure
        }
    }
}

/// A set of selected files and their shared submission lifecycle.
pub struct UploadBatch {
    options: BatchOptions,
    tasks: Vec<UploadTask>,
    /// User-visible notices from selection (duplicate drops).
    notices: Vec<String>,
    /// Whether a submission is currently running.
    submitting: bool,
}

impl UploadBatch {
    /// Create an empty batch with the given validation rules.
    pub fn new(options: BatchOptions) -> Self {
        Self {
            options,
            tasks: Vec::new(),
            notices: Vec::new(),
            submitting: false,
        }
    }

    /// The tasks in selection order, including rejected ones.
    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    /// Notices produced at selection time.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Whether at least one task is ready to submit.
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.tasks.iter().any(UploadTask::is_submittable)
    }

    /// Select a file into the batch.
    ///
    /// Invalid files enter `Error` immediately with a descriptive message
    /// and stay visible; a file matching an already-selected name and size
    /// is dropped with a notice. Returns the ID of the task that now
    /// represents the file, or `None` if it was dropped as a duplicate.
    pub fn add(&mut self, file_name: &str, size: u64, source: PayloadSource) -> Option<Uuid> {
        if self
            .tasks
            .iter()
            .any(|t| t.file_name == file_name && t.size == size)
        {
            self.notices
                .push(format!("'{file_name}' is already selected; skipped"));
            return None;
        }

        let task = match self.validate(file_name, size) {
            Ok(()) => UploadTask::pending(file_name.to_string(), size, source),
            Err(message) => {
                UploadTask::rejected(file_name.to_string(), size, source, message)
            }
        };
        let id = task.id;
        self.tasks.push(task);
        Some(id)
    }

    fn validate(&self, file_name: &str, size: u64) -> Result<(), String> {
        let submittable = self.tasks.iter().filter(|t| t.is_submittable()).count();
        if submittable >= self.options.max_files {
            return Err(format!(
                "At most {} files may be uploaded at once",
                self.options.max_files
            ));
        }
        if size == 0 {
            return Err("File is empty".to_string());
        }
        if size > self.options.max_size_bytes {
            return Err(format!(
                "File exceeds the maximum upload size of {} MiB",
                self.options.max_size_bytes / (1024 * 1024)
            ));
        }
        let extension = extension_of(file_name);
        if !self.options.allowed_extensions.contains(&extension) {
            return Err(format!(
                "File type '.{extension}' is not allowed. Allowed types: {}",
                self.options.allowed_extensions.join(", ")
            ));
        }
        Ok(())
    }

    /// Remove a task from the batch.
    ///
    /// Refused while the task is uploading (cancel it instead) or while a
    /// batch submission is running.
    pub fn remove(&mut self, id: Uuid) -> AppResult<()> {
        if self.submitting {
            return Err(AppError::validation(
                "Cannot remove files while the batch is uploading; cancel instead",
            ));
        }
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Err(AppError::not_found("No such file in this batch"));
        };
        if self.tasks[index].status() == TaskStatus::Uploading {
            return Err(AppError::validation(
                "Cannot remove a file while it is uploading; cancel instead",
            ));
        }
        self.tasks.remove(index);
        Ok(())
    }

    /// Request cancellation of one task's transfer.
    pub fn cancel(&self, id: Uuid) -> AppResult<()> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("No such file in this batch"))?;
        task.cancel();
        Ok(())
    }

    /// Request cancellation of every unfinished task.
    ///
    /// In-flight and not-yet-started tasks all end in
    /// `Error("upload cancelled")`, deterministically.
    pub fn cancel_all(&self) {
        for task in &self.tasks {
            if matches!(task.status(), TaskStatus::Pending | TaskStatus::Uploading) {
                task.cancel();
            }
        }
    }

    /// Submit every pending task sequentially through `transport`.
    ///
    /// Each task's outcome is independent: a failed transfer marks that
    /// task `Error` and the walk continues with the next one.
    pub async fn submit(
        &mut self,
        transport: Arc<dyn FileTransport>,
        metadata: &UploadMetadata,
    ) -> BatchReport {
        self.submitting = true;
        let mut report = BatchReport {
            success_count: 0,
            error_count: 0,
        };

        for task in &mut self.tasks {
            if !task.is_submittable() {
                continue;
            }
            let cancel = task.cancel_token();
            if cancel.is_cancelled() {
                task.mark_error(CANCELLED_MESSAGE.to_string());
                report.error_count += 1;
                continue;
            }

            task.mark_uploading();
            let request = TransferRequest {
                file_name: task.file_name.clone(),
                size: task.size,
                source: task.source.clone(),
                metadata: metadata.clone(),
            };
            let progress = task.progress_handle();

            let result = tokio::select! {
                _ = cancel.cancelled() => Err(AppError::transport(CANCELLED_MESSAGE)),
                sent = transport.send(&request, progress, cancel.clone()) => sent,
            };

            match result {
                Ok(()) => {
                    task.mark_done();
                    report.success_count += 1;
                }
                Err(e) => {
                    let message = if cancel.is_cancelled() {
                        CANCELLED_MESSAGE.to_string()
                    } else {
                        e.message
                    };
                    task.mark_error(message);
                    report.error_count += 1;
                }
            }
        }

        self.submitting = false;
        info!(
            success = report.success_count,
            errors = report.error_count,
            "Upload batch finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio_util::sync::CancellationToken;

    use crate::progress::ProgressHandle;

    /// Transport scripted per file name: fail, hang until cancelled, or
    /// succeed with staged progress.
    struct ScriptedTransport;

    #[async_trait]
    impl FileTransport for ScriptedTransport {
        async fn send(
            &self,
            request: &TransferRequest,
            progress: ProgressHandle,
            cancel: CancellationToken,
        ) -> AppResult<()> {
            if request.file_name.starts_with("fail") {
                progress.set(40);
                return Err(AppError::transport("connection reset"));
            }
            if request.file_name.starts_with("hang") {
                cancel.cancelled().await;
                return Err(AppError::transport(CANCELLED_MESSAGE));
            }
            progress.set(50);
            progress.set(100);
            Ok(())
        }
    }

    fn payload(size: usize) -> PayloadSource {
        PayloadSource::Bytes(Bytes::from(vec![0u8; size]))
    }

    fn batch_with(names: &[(&str, u64)]) -> UploadBatch {
        let mut batch = UploadBatch::new(BatchOptions::default());
        for (name, size) in names {
            batch.add(name, *size, payload(*size as usize));
        }
        batch
    }

    #[test]
    fn test_oversized_file_errors_at_selection_and_is_excluded() {
        let batch = batch_with(&[("huge.pdf", 15 * 1024 * 1024)]);
        let task = &batch.tasks()[0];
        assert_eq!(task.status(), TaskStatus::Error);
        assert!(task.error_message().unwrap().contains("maximum upload size"));
        assert!(!batch.can_submit());
    }

    #[test]
    fn test_disallowed_extension_errors_at_selection() {
        let batch = batch_with(&[("tool.exe", 100)]);
        let task = &batch.tasks()[0];
        assert_eq!(task.status(), TaskStatus::Error);
        assert!(task.error_message().unwrap().contains(".exe"));
    }

    #[test]
    fn test_duplicate_selection_is_dropped_with_notice() {
        let mut batch = batch_with(&[("report.pdf", 100)]);
        let second = batch.add("report.pdf", 100, payload(100));
        assert!(second.is_none());
        assert_eq!(batch.tasks().len(), 1);
        assert_eq!(batch.notices().len(), 1);

        // Same name with a different size is a different file.
        assert!(batch.add("report.pdf", 200, payload(200)).is_some());
    }

    #[test]
    fn test_invalid_file_plus_valid_file_keeps_submit_enabled() {
        let batch = batch_with(&[("huge.pdf", 15 * 1024 * 1024), ("ok.pdf", 100)]);
        assert!(batch.can_submit());
    }

    #[tokio::test]
    async fn test_batch_independence_and_partial_report() {
        let mut batch = batch_with(&[("one.pdf", 100), ("fail-two.pdf", 100), ("three.pdf", 100)]);
        let report = batch
            .submit(Arc::new(ScriptedTransport), &UploadMetadata::default())
            .await;

        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.outcome(), BatchOutcome::PartialSuccess);

        let statuses: Vec<TaskStatus> = batch.tasks().iter().map(|t| t.status()).collect();
        assert_eq!(
            statuses,
            vec![TaskStatus::Done, TaskStatus::Error, TaskStatus::Done]
        );
        assert_eq!(batch.tasks()[0].progress(), 100);
        assert_eq!(
            batch.tasks()[1].error_message().unwrap(),
            "connection reset"
        );
    }

    #[tokio::test]
    async fn test_full_success_and_full_failure_outcomes() {
        let mut all_good = batch_with(&[("a.pdf", 1), ("b.pdf", 2)]);
        let report = all_good
            .submit(Arc::new(ScriptedTransport), &UploadMetadata::default())
            .await;
        assert_eq!(report.outcome(), BatchOutcome::FullSuccess);

        let mut all_bad = batch_with(&[("fail-a.pdf", 1), ("fail-b.pdf", 2)]);
        let report = all_bad
            .submit(Arc::new(ScriptedTransport), &UploadMetadata::default())
            .await;
        assert_eq!(report.outcome(), BatchOutcome::FullFailure);
    }

    #[tokio::test]
    async fn test_cancelling_one_task_leaves_siblings_alone() {
        let mut batch = batch_with(&[("one.pdf", 100), ("hang-two.pdf", 100), ("three.pdf", 100)]);
        // Cancel the hanging task before submission reaches it.
        let hanging_id = batch.tasks()[1].id;
        batch.cancel(hanging_id).unwrap();

        let report = batch
            .submit(Arc::new(ScriptedTransport), &UploadMetadata::default())
            .await;

        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(batch.tasks()[1].status(), TaskStatus::Error);
        assert_eq!(batch.tasks()[1].error_message().unwrap(), CANCELLED_MESSAGE);
        assert_eq!(batch.tasks()[0].status(), TaskStatus::Done);
        assert_eq!(batch.tasks()[2].status(), TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_cancel_all_marks_every_unfinished_task() {
        let mut batch = batch_with(&[("hang-a.pdf", 1), ("hang-b.pdf", 2)]);
        batch.cancel_all();
        let report = batch
            .submit(Arc::new(ScriptedTransport), &UploadMetadata::default())
            .await;

        assert_eq!(report.outcome(), BatchOutcome::FullFailure);
        for task in batch.tasks() {
            assert_eq!(task.status(), TaskStatus::Error);
            assert_eq!(task.error_message().unwrap(), CANCELLED_MESSAGE);
        }
    }

    #[test]
    fn test_pending_tasks_can_be_removed() {
        let mut batch = batch_with(&[("one.pdf", 100), ("two.pdf", 100)]);
        let id = batch.tasks()[0].id;
        batch.remove(id).unwrap();
        assert_eq!(batch.tasks().len(), 1);
        assert!(batch.remove(id).is_err());
    }

    #[test]
    fn test_metadata_department_rules() {
        let meta = UploadMetadata {
            department: Some("IT".to_string()),
            ..Default::default()
        };
        // Regular users get their own department substituted.
        let resolved = meta
            .clone()
            .resolved_for(UserRole::User, Some("HR"))
            .unwrap();
        assert_eq!(resolved.department.as_deref(), Some("HR"));

        // Admins must pick one explicitly.
        let err = UploadMetadata::default()
            .resolved_for(UserRole::Admin, None)
            .unwrap_err();
        assert_eq!(err.kind, archivio_core::error::ErrorKind::Validation);

        let kept = meta.resolved_for(UserRole::Admin, None).unwrap();
        assert_eq!(kept.department.as_deref(), Some("IT"));
    }
}
