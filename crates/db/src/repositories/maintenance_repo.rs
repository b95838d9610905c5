//! Repository for `asset_maintenance_records`.
//!
//! Append-only: there is deliberately no update or delete here. Records
//! disappear only when their asset is deleted (cascade).

use itam_core::maintenance::MaintenanceEntry;
use itam_core::types::DbId;
use sqlx::PgPool;

use crate::models::maintenance::MaintenanceRecord;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, asset_id, title, description, performed_at, performed_by, created_at";

/// Provides maintenance-history operations.
pub struct MaintenanceRepo;

impl MaintenanceRepo {
    /// Append a record to an asset's history and touch the asset's
    /// `updated_at` in the same transaction.
    ///
    /// Returns `None` if the asset does not exist.
    pub async fn append(
        pool: &PgPool,
        asset_id: &str,
        entry: &MaintenanceEntry,
        performed_by: Option<DbId>,
    ) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let touched = sqlx::query("UPDATE assets SET updated_at = NOW() WHERE id = $1")
            .bind(asset_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO asset_maintenance_records
                (asset_id, title, description, performed_at, performed_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(asset_id)
            .bind(&entry.title)
            .bind(&entry.description)
            .bind(entry.performed_at)
            .bind(performed_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    /// An asset's history in insertion order.
    pub async fn list_for_asset(
        pool: &PgPool,
        asset_id: &str,
    ) -> Result<Vec<MaintenanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_maintenance_records
             WHERE asset_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }
}
