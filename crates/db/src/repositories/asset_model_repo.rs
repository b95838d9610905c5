//! Repository for the `asset_models` table.

use itam_core::catalog::{validate_name, CatalogKind};
use itam_core::error::CoreError;
use itam_core::types::DbId;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::error::{unique_violation_as_conflict, DbError};
use crate::models::asset_model::{AssetModel, CreateAssetModel, ModelNames, UpdateAssetModel};

/// Model columns joined with the referenced manufacturer and category names.
const SELECT: &str = "SELECT m.id, m.name, m.model_number, m.description, \
                      m.manufacturer_id, mf.name AS manufacturer_name, \
                      m.category_id, c.name AS category_name, m.image_path, \
                      m.is_active, m.notes, m.created_at, m.updated_at \
                      FROM asset_models m \
                      JOIN manufacturers mf ON mf.id = m.manufacturer_id \
                      JOIN categories c ON c.id = m.category_id";

/// Provides CRUD operations for asset models.
pub struct AssetModelRepo;

impl AssetModelRepo {
    /// Insert a new model.
    ///
    /// Fails validation if the manufacturer or category does not exist and
    /// conflicts if the name is taken.
    pub async fn create(pool: &PgPool, input: &CreateAssetModel) -> Result<AssetModel, DbError> {
        let name = validate_name(CatalogKind::Model, &input.name)?;
        let model_number = required_model_number(&input.model_number)?;

        let mut tx = pool.begin().await?;
        ensure_references(&mut tx, Some(input.manufacturer_id), Some(input.category_id)).await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO asset_models
                (name, model_number, description, manufacturer_id, category_id, image_path,
                 is_active, notes)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, true), $8)
             RETURNING id",
        )
        .bind(&name)
        .bind(&model_number)
        .bind(&input.description)
        .bind(input.manufacturer_id)
        .bind(input.category_id)
        .bind(&input.image_path)
        .bind(input.is_active)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            unique_violation_as_conflict(e, "uq_asset_models_name", || {
                format!("Model '{name}' already exists")
            })
        })?;

        let model = fetch_by_id(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(model)
    }

    /// Find a model by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetModel>, sqlx::Error> {
        fetch_by_id(pool, id).await
    }

    /// List models ordered by name. Inactive rows only when requested.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<AssetModel>, sqlx::Error> {
        let query = format!("{SELECT} WHERE ($1 OR m.is_active) ORDER BY m.name");
        sqlx::query_as::<_, AssetModel>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a model. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssetModel,
    ) -> Result<Option<AssetModel>, DbError> {
        let name = input
            .name
            .as_deref()
            .map(|n| validate_name(CatalogKind::Model, n))
            .transpose()?;
        let model_number = input
            .model_number
            .as_deref()
            .map(required_model_number)
            .transpose()?;

        let mut tx = pool.begin().await?;
        ensure_references(&mut tx, input.manufacturer_id, input.category_id).await?;

        let updated: Option<(DbId,)> = sqlx::query_as(
            "UPDATE asset_models SET
                name = COALESCE($2, name),
                model_number = COALESCE($3, model_number),
                description = COALESCE($4, description),
                manufacturer_id = COALESCE($5, manufacturer_id),
                category_id = COALESCE($6, category_id),
                image_path = COALESCE($7, image_path),
                is_active = COALESCE($8, is_active),
                notes = COALESCE($9, notes)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&name)
        .bind(&model_number)
        .bind(&input.description)
        .bind(input.manufacturer_id)
        .bind(input.category_id)
        .bind(&input.image_path)
        .bind(input.is_active)
        .bind(&input.notes)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            unique_violation_as_conflict(e, "uq_asset_models_name", || {
                format!("Model '{}' already exists", name.as_deref().unwrap_or_default())
            })
        })?;

        let Some((id,)) = updated else {
            return Ok(None);
        };
        if input.manufacturer_id.is_some() || input.category_id.is_some() {
            let rows = reproject_legacy_fields(&mut tx, id).await?;
            tracing::debug!(model_id = id, rows, "Re-projected legacy asset fields");
        }
        let model = fetch_by_id(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(model)
    }

    /// The category and manufacturer names a model resolves to, or `None`
    /// if it does not exist. The model row is share-locked.
    pub async fn resolved_names<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ModelNames>, sqlx::Error> {
        sqlx::query_as::<_, ModelNames>(
            "SELECT c.name AS category_name, mf.name AS manufacturer_name
             FROM asset_models m
             JOIN manufacturers mf ON mf.id = m.manufacturer_id
             JOIN categories c ON c.id = m.category_id
             WHERE m.id = $1
             FOR SHARE OF m",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}

async fn fetch_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: DbId,
) -> Result<Option<AssetModel>, sqlx::Error> {
    let query = format!("{SELECT} WHERE m.id = $1");
    sqlx::query_as::<_, AssetModel>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

fn required_model_number(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Model number is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Fail validation if a given manufacturer or category id does not exist.
/// The rows are share-locked so a concurrent delete cannot slip in.
async fn ensure_references(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    manufacturer_id: Option<DbId>,
    category_id: Option<DbId>,
) -> Result<(), DbError> {
    if let Some(id) = manufacturer_id {
        let found: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM manufacturers WHERE id = $1 FOR SHARE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        if found.is_none() {
            return Err(CoreError::Validation(format!("Manufacturer {id} does not exist")).into());
        }
    }
    if let Some(id) = category_id {
        let found: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM categories WHERE id = $1 FOR SHARE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        if found.is_none() {
            return Err(CoreError::Validation(format!("Category {id} does not exist")).into());
        }
    }
    Ok(())
}

/// Point the legacy fields of a model's assets at its current references.
/// Blank legacy fields stay blank.
async fn reproject_legacy_fields(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    model_id: DbId,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE assets a SET
            legacy_type = CASE WHEN a.legacy_type IS NULL THEN NULL ELSE c.name END,
            legacy_manufacturer =
                CASE WHEN a.legacy_manufacturer IS NULL THEN NULL ELSE mf.name END
         FROM asset_models m
         JOIN manufacturers mf ON mf.id = m.manufacturer_id
         JOIN categories c ON c.id = m.category_id
         WHERE a.model_id = m.id AND m.id = $1
           AND (a.legacy_type IS NOT NULL OR a.legacy_manufacturer IS NOT NULL)",
    )
    .bind(model_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}
