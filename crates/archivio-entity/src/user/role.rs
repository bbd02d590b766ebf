//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the access control system.
///
/// Roles are stored and compared as this enum everywhere; raw strings are
/// parsed case-insensitively once, at the system boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Unrestricted system owner.
    Superuser,
    /// Manages users, departments, and every department's files.
    Admin,
    /// Regular member scoped to their own department.
    User,
}

impl UserRole {
    /// Check whether this role carries administrative privileges.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Superuser | Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superuser => "superuser",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = archivio_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "superuser" => Ok(Self::Superuser),
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(archivio_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: superuser, admin, user"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_normalizes_case() {
        assert_eq!("SUPERUSER".parse::<UserRole>().unwrap(), UserRole::Superuser);
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_elevated_roles() {
        assert!(UserRole::Superuser.is_elevated());
        assert!(UserRole::Admin.is_elevated());
        assert!(!UserRole::User.is_elevated());
    }
}
