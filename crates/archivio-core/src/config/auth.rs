//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign JWT bearer tokens.
    pub jwt_secret: String,
    /// Access token lifetime in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Minimum password length for new accounts.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: u32,
}

fn default_token_ttl_hours() -> i64 {
    168 // 7 days
}

fn default_password_min_length() -> u32 {
    8
}
