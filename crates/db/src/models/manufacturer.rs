//! Manufacturer entity model and DTOs.

use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A manufacturer row from the `manufacturers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Manufacturer {
    pub id: DbId,
    pub name: String,
    /// Public path returned by the upload store, e.g. `/uploads/ManufacturerLogos/x.png`.
    pub logo_path: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new manufacturer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateManufacturer {
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating a manufacturer. Names change only through rename.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateManufacturer {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    pub is_active: Option<bool>,
}
