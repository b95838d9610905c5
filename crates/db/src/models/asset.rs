//! Asset ledger entity model and DTOs.

use itam_core::error::CoreError;
use itam_core::ledger::{normalize_text, validate_cost, validate_serial_number};
use itam_core::status::{AssetStatus, StatusId};
use itam_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::maintenance::MaintenanceRecord;

/// An `assets` row with its model, manufacturer, category and status
/// resolved. The names are read-only projections of the references.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    /// Human-readable asset tag, e.g. `A1000`.
    pub id: String,
    pub model_id: DbId,
    pub model_name: String,
    pub model_number: String,
    pub manufacturer_id: DbId,
    pub manufacturer_name: String,
    pub category_id: DbId,
    pub category_name: String,
    pub serial_number: String,
    pub purchase_date: Option<Date>,
    pub warranty_expiry: Option<Date>,
    pub cost: Option<f64>,
    pub status_id: StatusId,
    /// Display name from `asset_statuses`.
    pub status: String,
    pub assigned_to: Option<String>,
    pub assigned_user_id: Option<DbId>,
    pub notes: Option<String>,
    pub legacy_type: Option<String>,
    pub legacy_manufacturer: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An asset together with its full maintenance history (insertion order).
#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub maintenance_history: Vec<MaintenanceRecord>,
}

/// DTO for creating a new asset. The tag is always generated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub model_id: DbId,
    pub serial_number: String,
    pub purchase_date: Option<Date>,
    pub warranty_expiry: Option<Date>,
    pub cost: Option<f64>,
    /// Display name or identifier. Defaults to "In Stock" if omitted.
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_user_id: Option<DbId>,
    pub notes: Option<String>,
    /// Must name the model's category if given.
    pub legacy_type: Option<String>,
    /// Must name the model's manufacturer if given.
    pub legacy_manufacturer: Option<String>,
}

impl CreateAsset {
    /// Validate field rules and return a trimmed copy plus the resolved status.
    pub fn validated(&self) -> Result<(Self, AssetStatus), CoreError> {
        let serial_number = validate_serial_number(&self.serial_number)?;
        validate_cost(self.cost)?;
        let status = match self.status.as_deref() {
            Some(raw) => AssetStatus::parse_strict(raw)?,
            None => AssetStatus::DEFAULT,
        };
        Ok((
            Self {
                serial_number,
                assigned_to: normalize_text(self.assigned_to.as_deref()),
                notes: normalize_text(self.notes.as_deref()),
                legacy_type: normalize_text(self.legacy_type.as_deref()),
                legacy_manufacturer: normalize_text(self.legacy_manufacturer.as_deref()),
                ..self.clone()
            },
            status,
        ))
    }
}

/// DTO for updating an asset. All fields are optional; absent fields keep
/// their current value. A blank `assigned_to` or `notes` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAsset {
    pub model_id: Option<DbId>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<Date>,
    pub warranty_expiry: Option<Date>,
    pub cost: Option<f64>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_user_id: Option<DbId>,
    pub notes: Option<String>,
    pub legacy_type: Option<String>,
    pub legacy_manufacturer: Option<String>,
}

impl UpdateAsset {
    /// Validate the fields that are present and return a trimmed copy plus
    /// the resolved status, if one was given.
    ///
    /// Blank `assigned_to` and `notes` stay `Some("")` so the update can
    /// tell "clear" apart from "leave unchanged".
    pub fn validated(&self) -> Result<(Self, Option<AssetStatus>), CoreError> {
        let serial_number = self
            .serial_number
            .as_deref()
            .map(validate_serial_number)
            .transpose()?;
        validate_cost(self.cost)?;
        let status = self
            .status
            .as_deref()
            .map(AssetStatus::parse_strict)
            .transpose()?;
        Ok((
            Self {
                serial_number,
                assigned_to: self.assigned_to.as_deref().map(|s| s.trim().to_string()),
                notes: self.notes.as_deref().map(|s| s.trim().to_string()),
                legacy_type: normalize_text(self.legacy_type.as_deref()),
                legacy_manufacturer: normalize_text(self.legacy_manufacturer.as_deref()),
                ..self.clone()
            },
            status,
        ))
    }
}

/// Request body for `PATCH /assets/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAssetStatus {
    pub status: String,
}

/// Query parameters for listing the ledger.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetListParams {
    /// Case-insensitive substring over tag, model name/number and serial.
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    /// Category name, matched against the resolved category or `legacy_type`.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Display name or identifier.
    pub status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One page of ledger results.
#[derive(Debug, Clone, Serialize)]
pub struct AssetPage {
    pub items: Vec<Asset>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
