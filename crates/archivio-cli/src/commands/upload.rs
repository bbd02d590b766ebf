//! Batch file upload against a running Archivio server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dialoguer::Password;
use serde::Deserialize;

use archivio_core::error::{AppError, ErrorKind};
use archivio_entity::user::UserRole;
use archivio_uploader::batch::{BatchOptions, BatchOutcome, UploadBatch, UploadMetadata};
use archivio_uploader::task::{PayloadSource, TaskStatus};
use archivio_uploader::transport::HttpTransport;

use crate::output;

/// Arguments for the upload command.
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Server base URL
    #[arg(short, long, default_value = "http://localhost:8080")]
    pub server: String,

    /// Username to authenticate as
    #[arg(short, long)]
    pub username: String,

    /// Target department (required unless uploading as a regular user)
    #[arg(short, long)]
    pub department: Option<String>,

    /// Category label
    #[arg(short, long)]
    pub category: Option<String>,

    /// Description applied to every file
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    role: String,
    department: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: LoginUser,
}

/// Log in, build the batch, and drive it through the HTTP transport.
pub async fn execute(args: &UploadArgs) -> Result<(), AppError> {
    let password = Password::new()
        .with_prompt(format!("Password for {}", args.username))
        .interact()
        .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;

    let login = login(&args.server, &args.username, &password).await?;
    let role: UserRole = login.user.role.parse()?;

    let metadata = UploadMetadata {
        department: args.department.clone(),
        category: args.category.clone(),
        description: args.description.clone(),
    }
    .resolved_for(role, login.user.department.as_deref())?;

    let mut batch = UploadBatch::new(BatchOptions::default());
    for path in &args.files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let size = tokio::fs::metadata(path)
            .await
            .map(|m| m.len())
            .map_err(|e| AppError::not_found(format!("Cannot read '{}': {e}", path.display())))?;
        batch.add(&name, size, PayloadSource::Path(path.clone()));
    }

    for notice in batch.notices() {
        output::print_warning(notice);
    }
    for task in batch.tasks().iter().filter(|t| t.status() == TaskStatus::Error) {
        output::print_failure(&format!(
            "{}: {}",
            task.file_name,
            task.error_message().unwrap_or("rejected")
        ));
    }
    if !batch.can_submit() {
        return Err(AppError::validation("No valid files to upload"));
    }

    let transport = Arc::new(HttpTransport::new(&args.server, &login.token));
    let report = batch.submit(transport, &metadata).await;

    for task in batch.tasks() {
        match task.status() {
            TaskStatus::Done => output::print_success(&format!("{} (100%)", task.file_name)),
            TaskStatus::Error => output::print_failure(&format!(
                "{}: {}",
                task.file_name,
                task.error_message().unwrap_or("failed")
            )),
            _ => {}
        }
    }

    match report.outcome() {
        BatchOutcome::FullSuccess => {
            output::print_success(&format!("Uploaded {} file(s)", report.success_count));
            Ok(())
        }
        BatchOutcome::PartialSuccess => {
            output::print_warning(&format!(
                "Uploaded {} file(s), {} failed",
                report.success_count, report.error_count
            ));
            Ok(())
        }
        BatchOutcome::FullFailure => Err(AppError::transport("All uploads failed")),
    }
}

/// Authenticate against the server and return the token and user.
async fn login(server: &str, username: &str, password: &str) -> Result<LoginResponse, AppError> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/auth/login", server.trim_end_matches('/')))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transport, format!("Login failed: {e}"), e))?;

    if !response.status().is_success() {
        return Err(AppError::authentication("Login rejected; check credentials"));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Serialization, "Malformed login response", e))
}
