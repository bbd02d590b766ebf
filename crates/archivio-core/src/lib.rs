//! # archivio-core
//!
//! Core crate for Archivio. Contains configuration schemas, the unified
//! error system, pagination/sorting types, and the adaptive presentation
//! rules used by list endpoints.
//!
//! This crate has **no** internal dependencies on other Archivio crates.

pub mod config;
pub mod error;
pub mod presentation;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
