//! Administrator account creation.

use clap::Args;
use dialoguer::{Input, Password};

use archivio_auth::password::{PasswordHasher, PasswordValidator};
use archivio_core::error::AppError;
use archivio_database::postgres::PgUserStore;
use archivio_database::store::UserStore;
use archivio_entity::user::{CreateUser, UserRole};

use crate::output;

/// Arguments for the admin command.
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Username for the new administrator
    #[arg(short, long)]
    pub username: Option<String>,

    /// Email for the new administrator
    #[arg(short, long)]
    pub email: Option<String>,

    /// Create a superuser instead of an admin
    #[arg(long)]
    pub superuser: bool,
}

/// Create an administrator account directly in the database.
///
/// Used to bootstrap a fresh installation before any admin exists; later
/// accounts are created through the API.
pub async fn execute(args: &AdminArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let users = PgUserStore::new(pool.pool().clone());

    let username: String = match &args.username {
        Some(username) => username.clone(),
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?,
    };
    let email: String = match &args.email {
        Some(email) => email.clone(),
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;

    PasswordValidator::new(&config.auth).validate(&password)?;
    let password_hash = PasswordHasher::new().hash_password(&password)?;

    let role = if args.superuser {
        UserRole::Superuser
    } else {
        UserRole::Admin
    };

    let user = users
        .create(&CreateUser {
            username,
            email,
            password_hash,
            role,
            department: None,
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
        })
        .await?;

    output::print_success(&format!(
        "Created {} '{}' (id: {})",
        user.role, user.username, user.id
    ));
    Ok(())
}
