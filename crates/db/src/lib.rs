//! Persistence layer for the hardware inventory.
//!
//! Exposes the connection pool, migrations, entity models and the
//! repositories that own every query against the ledger and catalogs.

pub mod error;
pub mod models;
pub mod repositories;
pub mod retry;

use itam_core::asset_tag::{format_asset_tag, ASSET_TAG_SEQUENCE};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Ledger figures reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    /// Assets currently in the ledger.
    pub assets: i64,
    /// Tag the next created asset will receive.
    pub next_asset_tag: String,
    /// Migrations recorded as applied.
    pub migrations_applied: i64,
}

/// Read the asset count, the tag counter and the migration count in one
/// round trip.
pub async fn ledger_snapshot(pool: &DbPool) -> Result<LedgerSnapshot, sqlx::Error> {
    let (assets, next_value, migrations_applied): (i64, i64, i64) = sqlx::query_as(
        "SELECT
            (SELECT COUNT(*) FROM assets),
            (SELECT next_value FROM id_sequences WHERE name = $1),
            (SELECT COUNT(*) FROM _sqlx_migrations WHERE success)",
    )
    .bind(ASSET_TAG_SEQUENCE)
    .fetch_one(pool)
    .await?;

    Ok(LedgerSnapshot {
        assets,
        next_asset_tag: format_asset_tag(next_value),
        migrations_applied,
    })
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
