//! One file's upload lifecycle.

use std::path::PathBuf;

use bytes::Bytes;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::progress::ProgressHandle;

/// Error message used when a transfer is cancelled.
pub const CANCELLED_MESSAGE: &str = "upload cancelled";

/// Lifecycle state of one upload task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Validated and waiting for submission.
    Pending,
    /// Transfer in flight.
    Uploading,
    /// Transfer finished successfully.
    Done,
    /// Validation failed, the transfer failed, or it was cancelled.
    Error,
}

/// Where a task's payload comes from.
#[derive(Debug, Clone)]
pub enum PayloadSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An in-memory payload.
    Bytes(Bytes),
}

/// One selected file moving through `pending → uploading → done | error`.
///
/// The task owns its progress cell and its cancellation token; nothing
/// else writes to either.
#[derive(Debug)]
pub struct UploadTask {
    /// Task identifier, unique within a batch.
    pub id: Uuid,
    /// The name the file will be uploaded under.
    pub file_name: String,
    /// Payload size in bytes.
    pub size: u64,
    /// Payload source.
    pub source: PayloadSource,
    /// Current lifecycle state.
    status: TaskStatus,
    /// Human-readable reason when `status == Error`.
    error_message: Option<String>,
    /// Writer side of the progress cell.
    progress: ProgressHandle,
    /// Reader side of the progress cell.
    progress_rx: watch::Receiver<u8>,
    /// Cancels this task's in-flight transfer.
    cancel: CancellationToken,
}

impl UploadTask {
    /// Create a task in `Pending` state.
    pub fn pending(file_name: String, size: u64, source: PayloadSource) -> Self {
        Self::with_status(file_name, size, source, TaskStatus::Pending, None)
    }

    /// Create a task that failed validation at selection time.
    pub fn rejected(file_name: String, size: u64, source: PayloadSource, message: String) -> Self {
        Self::with_status(file_name, size, source, TaskStatus::Error, Some(message))
    }

    fn with_status(
        file_name: String,
        size: u64,
        source: PayloadSource,
        status: TaskStatus,
        error_message: Option<String>,
    ) -> Self {
        let (progress, progress_rx) = ProgressHandle::new();
        Self {
            id: Uuid::new_v4(),
            file_name,
            size,
            source,
            status,
            error_message,
            progress,
            progress_rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Error message, when the task is in `Error` state.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Current progress (0–100).
    pub fn progress(&self) -> u8 {
        *self.progress_rx.borrow()
    }

    /// Subscribe to progress updates.
    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress_rx.clone()
    }

    /// The task's progress writer, handed to its transport.
    pub(crate) fn progress_handle(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Token that aborts this task's transfer when triggered.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request cancellation of this task.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether this task will be included in a submission.
    pub fn is_submittable(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub(crate) fn mark_uploading(&mut self) {
        self.status = TaskStatus::Uploading;
    }

    pub(crate) fn mark_done(&mut self) {
        self.status = TaskStatus::Done;
        self.progress.complete();
    }

    pub(crate) fn mark_error(&mut self, message: String) {
        self.status = TaskStatus::Error;
        self.error_message = Some(message);
    }
}
