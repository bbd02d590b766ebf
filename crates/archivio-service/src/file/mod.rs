//! File operations: listing, retrieval, upload, download, lifecycle.

pub mod query;
pub mod service;
pub mod upload;

pub use query::{FileListing, FileQueryEngine, FileWithUploader, ListFilesParams};
pub use service::{DownloadPayload, FileService};
pub use upload::{UploadRequest, UploadService};
