//! Embedded schema migrations.
//!
//! The schema lives in the workspace `migrations/` directory: the catalog
//! mirror (`departments`, `pages`), `roles` with its `permissions_version`
//! token, and `role_permissions` keyed by `(role_id, page_id)`.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use rolegate_core::error::{AppError, ErrorKind};
use rolegate_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies every pending migration; applied ones are skipped.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let known = MIGRATOR.iter().count();
    info!(known, "Applying access schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to apply access schema: {e}"),
            e,
        )
    })?;

    info!("Access schema is up to date");
    Ok(())
}
