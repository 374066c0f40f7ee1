//! Session table migration.
//!
//! # Usage
//!
//! ```bash
//! usuba-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `USUBA_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! The menu site never creates its session table on startup; run this once
//! per database before the first deploy.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the `tower_sessions` schema and session table.
///
/// # Errors
///
/// Returns an error if no database URL is configured, the connection fails
/// or the table cannot be created.
pub async fn sessions() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("USUBA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("USUBA_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Session table ready");
    Ok(())
}
