//! Error type for operations that mix domain validation with storage.
//!
//! Plain repositories return `sqlx::Error`. Coordinated operations that
//! validate inside a transaction (asset creation, catalog rename and
//! delete) return [`DbError`] so a domain rejection and a storage failure
//! stay distinguishable to the HTTP layer.

use itam_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// PostgreSQL SQLSTATE for unique violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Turn a unique violation on `constraint` into a domain conflict with a
/// readable message. Any other error passes through unchanged.
pub fn unique_violation_as_conflict(
    err: sqlx::Error,
    constraint: &str,
    message: impl FnOnce() -> String,
) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
            && db_err.constraint() == Some(constraint)
        {
            return DbError::Core(CoreError::Conflict(message()));
        }
    }
    DbError::Database(err)
}
