//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod upload;

use clap::{Parser, Subcommand};

use archivio_core::config::AppConfig;
use archivio_core::error::AppError;
use archivio_database::DatabasePool;

/// Archivio — role-based document archive
#[derive(Debug, Parser)]
#[command(name = "archivio", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (config/<env>.toml overlay)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate,
    /// Create an administrator account
    Admin(admin::AdminArgs),
    /// Upload one or more files to a running server
    Upload(upload::UploadArgs),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(&self.env).await,
            Commands::Admin(args) => admin::execute(args, &self.env).await,
            Commands::Upload(args) => upload::execute(args).await,
        }
    }
}

/// Load configuration for the given environment.
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Connect to the configured database.
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
