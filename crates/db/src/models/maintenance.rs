//! Maintenance record entity and DTO.

use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `asset_maintenance_records`. Rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceRecord {
    pub id: DbId,
    pub asset_id: String,
    pub title: String,
    pub description: String,
    pub performed_at: Timestamp,
    pub performed_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Request body for appending a maintenance record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceRecord {
    pub title: String,
    pub description: String,
    /// Defaults to the time of the request if omitted.
    pub performed_at: Option<Timestamp>,
}
