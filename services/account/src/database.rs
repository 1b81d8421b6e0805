//! Database setup for the account service

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

/// Apply the embedded migrations in `migrations/`.
///
/// Applied migrations are tracked in `_sqlx_migrations`, so this is safe to
/// run on every start.
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations complete");
    Ok(())
}
