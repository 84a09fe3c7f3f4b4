//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use corner_shop_storefront::error::AppError;
use corner_shop_storefront::services::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Account operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Catalog operation failed.
    #[error(transparent)]
    App(#[from] AppError),
}

/// Connect to the storefront database.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    Ok(corner_shop_storefront::db::create_pool(&database_url).await?)
}
