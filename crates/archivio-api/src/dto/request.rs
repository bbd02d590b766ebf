//! Request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1))]
    pub username: String,
    /// Plaintext password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// New user account payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Plaintext password; validated against the password policy.
    #[validate(length(min = 1))]
    pub password: String,
    /// Role name, parsed case-insensitively.
    pub role: String,
    /// Department assignment.
    pub department: Option<String>,
    /// Given name.
    #[validate(length(min = 1))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1))]
    pub last_name: String,
}

/// New department payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    /// Unique department name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Department update payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    /// New name.
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}
