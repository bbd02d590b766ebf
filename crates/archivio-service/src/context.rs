//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use archivio_auth::policy::Principal;
use archivio_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API layer from a validated bearer token and passed into
/// service methods explicitly, so every operation knows *who* is acting
/// without consulting ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// The user's department at the time the token was issued.
    pub department: Option<String>,
    /// The username (convenience field from the token claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        department: Option<String>,
        username: String,
    ) -> Self {
        Self {
            user_id,
            role,
            department,
            username,
            request_time: Utc::now(),
        }
    }

    /// The caller as a policy principal.
    ///
    /// Tokens are only issued to active accounts, so the principal is
    /// considered active; operations that must catch mid-session
    /// deactivation (upload) re-load the user row instead.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user_id,
            role: self.role,
            department: self.department.clone(),
            is_active: true,
        }
    }

    /// Returns whether the caller holds an elevated role.
    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }
}
