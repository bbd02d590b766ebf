//! Database migration command.

use archivio_core::error::AppError;

use crate::output;

/// Run all pending migrations against the configured database.
pub async fn execute(env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    archivio_database::migration::run_migrations(pool.pool()).await?;

    output::print_success("Database migrations complete");
    Ok(())
}
