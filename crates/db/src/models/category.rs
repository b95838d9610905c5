//! Category entity model and DTOs.

use itam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A category row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Public path of the category picture, if any.
    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating a category. Names change only through rename.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub is_active: Option<bool>,
}
