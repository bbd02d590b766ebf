//! # archivio-service
//!
//! Business logic for Archivio. Services receive an explicit
//! [`context::RequestContext`] describing the caller and enforce the
//! access policy before touching the stores.

pub mod activity;
pub mod context;
pub mod department;
pub mod file;
pub mod stats;
pub mod user;

pub use context::RequestContext;
