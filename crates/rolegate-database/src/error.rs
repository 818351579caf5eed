//! Mapping from `sqlx` errors into the engine's error taxonomy.

use rolegate_core::error::{AppError, ErrorKind};

/// Classify a `sqlx` error.
///
/// - unique violation => `Conflict`
/// - foreign-key violation => `NotFound` (a referenced role or page is missing)
/// - pool timeout, closed pool, or I/O failure => `ServiceUnavailable`
/// - anything else => `Database`
pub fn db_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db) if db.is_unique_violation() => ErrorKind::Conflict,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => ErrorKind::NotFound,
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}
