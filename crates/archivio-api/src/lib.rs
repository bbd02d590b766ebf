//! # archivio-api
//!
//! HTTP API layer for Archivio: Axum router, handlers, auth extraction,
//! error mapping, and middleware.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
