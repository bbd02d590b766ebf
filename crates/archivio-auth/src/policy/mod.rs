//! Access policy evaluation.
//!
//! Pure yes/no answers to access questions, given the caller's role,
//! department, and the resource at hand. Every predicate is total: an
//! absent caller answers `false`, and nothing here panics or performs I/O.
//!
//! The contracts implemented here are the canonical ones: deleting a file
//! requires ownership or an elevated role; accessing a file requires an
//! elevated role, ownership, or membership of the file's department.

use uuid::Uuid;

use archivio_entity::file::StoredFile;
use archivio_entity::user::{User, UserRole};

/// The facts about a caller that access decisions depend on.
///
/// Built once at the system boundary (from a validated token or a loaded
/// user row) and passed explicitly into every check, rather than read from
/// ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The caller's user ID.
    pub id: Uuid,
    /// The caller's role.
    pub role: UserRole,
    /// The caller's department, if any.
    pub department: Option<String>,
    /// Whether the caller's account is active.
    pub is_active: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            department: user.department.clone(),
            is_active: user.is_active,
        }
    }
}

/// True iff the caller exists and holds one of `allowed_roles`.
pub fn has_access(caller: Option<&Principal>, allowed_roles: &[UserRole]) -> bool {
    match caller {
        Some(principal) => allowed_roles.contains(&principal.role),
        None => false,
    }
}

/// True iff the caller exists and is active. Any role may upload.
pub fn can_upload_files(caller: Option<&Principal>) -> bool {
    caller.is_some_and(|principal| principal.is_active)
}

/// True iff the caller may delete `file`.
///
/// Elevated roles may delete any file; a regular user may delete only
/// files they uploaded themselves.
pub fn can_delete_file(caller: Option<&Principal>, file: &StoredFile) -> bool {
    let Some(principal) = caller else {
        return false;
    };
    if principal.role.is_elevated() {
        return true;
    }
    file.uploaded_by == Some(principal.id)
}

/// True iff the caller may read `file`.
///
/// Elevated roles see everything; a regular user sees files they uploaded
/// or files belonging to their own department.
pub fn can_access_file(caller: Option<&Principal>, file: &StoredFile) -> bool {
    let Some(principal) = caller else {
        return false;
    };
    if principal.role.is_elevated() {
        return true;
    }
    if file.uploaded_by == Some(principal.id) {
        return true;
    }
    match (&file.department, &principal.department) {
        (Some(file_dept), Some(own_dept)) => file_dept == own_dept,
        _ => false,
    }
}

/// True iff the caller may create, edit, or delete departments.
pub fn can_manage_departments(caller: Option<&Principal>) -> bool {
    has_access(caller, &[UserRole::Superuser, UserRole::Admin])
}

/// True iff the caller may use the user-management surface.
pub fn can_access_user_management(caller: Option<&Principal>) -> bool {
    has_access(caller, &[UserRole::Superuser, UserRole::Admin])
}

/// True iff the caller may list the files owned by `owner_id`.
///
/// Callers may always list their own files; elevated roles may list
/// anyone's.
pub fn can_view_user_files(caller: Option<&Principal>, owner_id: Uuid) -> bool {
    let Some(principal) = caller else {
        return false;
    };
    principal.role.is_elevated() || principal.id == owner_id
}
