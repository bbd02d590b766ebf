//! User management and authentication.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use archivio_auth::password::{PasswordHasher, PasswordValidator};
use archivio_auth::policy;
use archivio_auth::jwt::JwtEncoder;
use archivio_core::error::AppError;
use archivio_core::result::AppResult;
use archivio_core::types::{Page, PageRequest};
use archivio_database::store::{ActivityStore, UserStore};
use archivio_entity::activity::{CreateActivityEvent, action};
use archivio_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Parameters for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUserParams {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Assigned role.
    pub role: UserRole,
    /// Department assignment.
    pub department: Option<String>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// User account management and credential verification.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityStore>,
    hasher: PasswordHasher,
    password_policy: PasswordValidator,
    jwt: JwtEncoder,
}

impl UserService {
    /// Create a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityStore>,
        hasher: PasswordHasher,
        password_policy: PasswordValidator,
        jwt: JwtEncoder,
    ) -> Self {
        Self {
            users,
            activity,
            hasher,
            password_policy,
            jwt,
        }
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// Inactive accounts and unknown usernames fail identically so the
    /// response does not reveal which part was wrong.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let invalid = || AppError::authentication("Invalid credentials");

        let user = self
            .users
            .find_by_username(username)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(invalid)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        self.users.record_login(user.id, Utc::now()).await?;

        let event = CreateActivityEvent::new(user.id, action::USER_LOGIN, "user", Some(user.id));
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record login activity");
        }

        let token = self.jwt.generate_token(&user)?;
        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(LoginOutcome { token, user })
    }

    /// Create a user account. Elevated roles only.
    pub async fn create_user(&self, ctx: &RequestContext, params: NewUserParams) -> AppResult<User> {
        if !policy::can_access_user_management(Some(&ctx.principal())) {
            return Err(AppError::authorization(
                "Only administrators may create users",
            ));
        }

        self.password_policy.validate(&params.password)?;
        let password_hash = self.hasher.hash_password(&params.password)?;

        let user = self
            .users
            .create(&CreateUser {
                username: params.username,
                email: params.email,
                password_hash,
                role: params.role,
                department: params.department,
                first_name: params.first_name,
                last_name: params.last_name,
            })
            .await?;

        let event = CreateActivityEvent::new(ctx.user_id, action::USER_CREATE, "user", Some(user.id));
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record user creation activity");
        }

        info!(user_id = %ctx.user_id, created = %user.id, "User created");
        Ok(user)
    }

    /// Delete a user account. Elevated roles only; self-deletion is refused.
    pub async fn delete_user(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !policy::can_access_user_management(Some(&ctx.principal())) {
            return Err(AppError::authorization(
                "Only administrators may delete users",
            ));
        }
        if ctx.user_id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        if !self.users.delete(id).await? {
            return Err(AppError::not_found("User not found"));
        }

        let event = CreateActivityEvent::new(ctx.user_id, action::USER_DELETE, "user", Some(id));
        if let Err(e) = self.activity.record(&event).await {
            tracing::warn!(error = %e, "Failed to record user deletion activity");
        }

        info!(user_id = %ctx.user_id, deleted = %id, "User deleted");
        Ok(())
    }

    /// List user accounts. Elevated roles only.
    pub async fn list_users(&self, ctx: &RequestContext, page: &PageRequest) -> AppResult<Page<User>> {
        if !policy::can_access_user_management(Some(&ctx.principal())) {
            return Err(AppError::authorization(
                "Only administrators may list users",
            ));
        }
        self.users.list(page).await
    }
}
