//! Stored file entity, status workflow, and listing filter vocabulary.

pub mod filter;
pub mod model;
pub mod status;

pub use filter::{FileFilter, FileSort, SortBy};
pub use model::{CreateStoredFile, StoredFile};
pub use status::FileStatus;
