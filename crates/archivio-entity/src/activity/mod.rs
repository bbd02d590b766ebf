//! Activity log entity.

pub mod model;

pub use model::{ActivityEvent, CreateActivityEvent, action};
