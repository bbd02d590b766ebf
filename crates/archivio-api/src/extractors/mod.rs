//! Request extractors.

pub mod auth;
pub mod list_query;
pub mod pagination;

pub use auth::AuthUser;
pub use list_query::ListFilesQuery;
pub use pagination::PaginationParams;
