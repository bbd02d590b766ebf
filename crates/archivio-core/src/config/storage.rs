//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Upload storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where uploaded files are stored.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum upload size in bytes (default 10 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Maximum number of files accepted in one upload batch.
    #[serde(default = "default_max_batch_files")]
    pub max_batch_files: usize,
    /// File extensions accepted for upload (lowercase, no leading dot).
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// When enabled, uploaded files start in `pending` status and must be
    /// approved before they are surfaced as approved documents.
    #[serde(default)]
    pub require_approval: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_size_bytes: default_max_upload(),
            max_batch_files: default_max_batch_files(),
            allowed_extensions: default_allowed_extensions(),
            require_approval: false,
        }
    }
}

impl StorageConfig {
    /// Check whether the given extension (lowercase, no dot) is accepted.
    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        self.allowed_extensions.iter().any(|a| a == ext)
    }
}

fn default_upload_dir() -> String {
    "./data/uploads".to_string()
}

fn default_max_upload() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

fn default_max_batch_files() -> usize {
    10
}

fn default_allowed_extensions() -> Vec<String> {
    ["pdf", "doc", "docx", "xls", "xlsx", "png", "jpg", "jpeg", "gif"]
        .into_iter()
        .map(String::from)
        .collect()
}
