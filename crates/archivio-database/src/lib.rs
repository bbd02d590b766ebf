//! # archivio-database
//!
//! Persistence for Archivio. The [`store`] module defines the storage
//! contracts consumed by the service layer; [`postgres`] implements them
//! on sqlx/PostgreSQL and [`memory`] provides an in-process implementation
//! for single-node tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ActivityStore, DepartmentStore, FileStore, UserStore};
