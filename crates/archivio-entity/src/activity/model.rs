//! Activity log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Well-known action names recorded in the activity log.
pub mod action {
    /// A file was uploaded.
    pub const FILE_UPLOAD: &str = "file.upload";
    /// A file was approved.
    pub const FILE_APPROVE: &str = "file.approve";
    /// A file was rejected.
    pub const FILE_REJECT: &str = "file.reject";
    /// A file was deleted.
    pub const FILE_DELETE: &str = "file.delete";
    /// A user account was created.
    pub const USER_CREATE: &str = "user.create";
    /// A user account was deleted.
    pub const USER_DELETE: &str = "user.delete";
    /// A user logged in.
    pub const USER_LOGIN: &str = "user.login";
    /// A department was created.
    pub const DEPARTMENT_CREATE: &str = "department.create";
    /// A department was deleted.
    pub const DEPARTMENT_DELETE: &str = "department.delete";
}

/// An immutable activity log entry recording a significant user action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityEvent {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// The action that was performed (e.g. `"file.upload"`).
    pub action: String,
    /// The type of target resource (e.g. `"file"`, `"user"`).
    pub target_type: String,
    /// The target resource ID, if applicable.
    pub target_id: Option<Uuid>,
    /// Additional details about the action (JSON).
    pub details: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new activity log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityEvent {
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// The action performed.
    pub action: String,
    /// Target resource type.
    pub target_type: String,
    /// Target resource ID.
    pub target_id: Option<Uuid>,
    /// Additional details.
    pub details: Option<serde_json::Value>,
}

impl CreateActivityEvent {
    /// Convenience constructor for the common action-on-target case.
    pub fn new(actor_id: Uuid, action: &str, target_type: &str, target_id: Option<Uuid>) -> Self {
        Self {
            actor_id,
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id,
            details: None,
        }
    }

    /// Attach a JSON details payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
