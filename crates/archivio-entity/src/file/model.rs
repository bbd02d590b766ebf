//! Stored file entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::FileStatus;

/// A document stored in the archive.
///
/// Deletion is a soft delete: the row keeps existing with
/// `is_deleted = true` and is excluded from every listing, count, and
/// search. The physical payload is removed separately.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredFile {
    /// Unique file identifier.
    pub id: Uuid,
    /// Name of the payload on disk (unique storage name).
    pub filename: String,
    /// Name the file was uploaded with, shown to users.
    pub original_name: String,
    /// Lowercased extension, without the leading dot.
    pub file_type: String,
    /// Payload size in bytes.
    pub file_size: i64,
    /// Storage locator of the payload.
    pub file_path: String,
    /// The uploading user, if still known.
    pub uploaded_by: Option<Uuid>,
    /// Department the document belongs to.
    pub department: Option<String>,
    /// Free-form category label.
    pub category: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Approval workflow status.
    pub status: FileStatus,
    /// When the file was uploaded.
    pub created_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoredFile {
    /// Storage name of the payload.
    pub filename: String,
    /// Display name.
    pub original_name: String,
    /// Lowercased extension.
    pub file_type: String,
    /// Payload size in bytes.
    pub file_size: i64,
    /// Storage locator.
    pub file_path: String,
    /// The uploading user.
    pub uploaded_by: Option<Uuid>,
    /// Department the document belongs to.
    pub department: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initial status.
    pub status: FileStatus,
}

/// Extract the lowercased extension of a file name, without the dot.
///
/// Returns an empty string when the name has no extension.
pub fn extension_of(name: &str) -> String {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}
