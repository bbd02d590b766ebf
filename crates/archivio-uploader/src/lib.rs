//! # archivio-uploader
//!
//! Client-side upload orchestration. A batch of selected files becomes a
//! set of independent [`task::UploadTask`] state machines
//! (`pending → uploading → done | error`); the batch driver submits them
//! sequentially through a [`transport::FileTransport`], with per-task
//! monotonic progress cells and per-task cancellation. One file's failure
//! never aborts its siblings.

pub mod batch;
pub mod progress;
pub mod task;
pub mod transport;

pub use batch::{BatchOutcome, BatchReport, UploadBatch, UploadMetadata};
pub use progress::ProgressHandle;
pub use task::{TaskStatus, UploadTask};
pub use transport::{FileTransport, HttpTransport, TransferRequest};
