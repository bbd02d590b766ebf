//! # archivio-storage
//!
//! Physical storage of uploaded document payloads on the local filesystem,
//! plus MIME type inference for downloads.

pub mod local;
pub mod mime;

pub use local::LocalBlobStore;
