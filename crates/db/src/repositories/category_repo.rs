//! Repository for the `categories` table.
//!
//! Renames and deletes go through [`crate::repositories::CatalogRepo`] so
//! the ledger's legacy fields and the in-use guard stay consistent.

use itam_core::catalog::{validate_name, CatalogKind};
use itam_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_violation_as_conflict, DbError};
use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image_path, is_active, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category. Fails with a conflict if the name is taken.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, DbError> {
        let name = validate_name(CatalogKind::Category, &input.name)?;
        let query = format!(
            "INSERT INTO categories (name, description, image_path, is_active)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&name)
            .bind(&input.description)
            .bind(&input.image_path)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                unique_violation_as_conflict(e, "uq_categories_name", || {
                    format!("Category '{name}' already exists")
                })
            })
    }

    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE name = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List categories ordered by name. Inactive rows only when requested.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE ($1 OR is_active)
             ORDER BY name"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                description = COALESCE($2, description),
                image_path = COALESCE($3, image_path),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(&input.image_path)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
