//! Asset model (product line) entity and DTOs.

use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An `asset_models` row joined with its manufacturer and category names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetModel {
    pub id: DbId,
    pub name: String,
    pub model_number: String,
    pub description: Option<String>,
    pub manufacturer_id: DbId,
    pub manufacturer_name: String,
    pub category_id: DbId,
    pub category_name: String,
    /// Public path of the product picture, if any.
    pub image_path: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The catalog names a model resolves to, used to keep an asset's legacy
/// fields in step with its references.
#[derive(Debug, Clone, FromRow)]
pub struct ModelNames {
    pub category_name: String,
    pub manufacturer_name: String,
}

/// DTO for creating a new model.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetModel {
    pub name: String,
    pub model_number: String,
    pub description: Option<String>,
    pub manufacturer_id: DbId,
    pub category_id: DbId,
    pub image_path: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// DTO for updating a model. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssetModel {
    pub name: Option<String>,
    pub model_number: Option<String>,
    pub description: Option<String>,
    pub manufacturer_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub image_path: Option<String>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}
