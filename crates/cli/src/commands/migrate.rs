//! Database migration command.
//!
//! Applies `crates/storefront/migrations/`. The session table is created by
//! the storefront itself at startup.

use super::{CommandError, connect};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
