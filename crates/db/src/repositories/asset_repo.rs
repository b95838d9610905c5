//! Repository for the asset ledger (`assets` table).
//!
//! Asset tags come from the `id_sequences` counter row, advanced inside the
//! same transaction as the insert. Concurrent creates serialize on that row
//! and a rolled-back create leaves the counter untouched.

use itam_core::activity::ActivityEntry;
use itam_core::asset_tag::{format_asset_tag, ASSET_TAG_SEQUENCE};
use itam_core::error::CoreError;
use itam_core::ledger::project_legacy_name;
use itam_core::search::{
    clamp_limit, clamp_page, ilike_pattern, page_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use itam_core::status::{AssetStatus, StatusId};
use itam_core::types::{DbId, Timestamp};
use sqlx::postgres::PgExecutor;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{unique_violation_as_conflict, DbError};
use crate::models::asset::{
    Asset, AssetDetail, AssetListParams, AssetPage, CreateAsset, UpdateAsset,
};
use crate::models::asset_model::ModelNames;
use crate::repositories::{AssetModelRepo, MaintenanceRepo};

/// Asset columns with model, manufacturer, category and status resolved.
const SELECT: &str = "SELECT a.id, a.model_id, m.name AS model_name, m.model_number, \
                      m.manufacturer_id, mf.name AS manufacturer_name, \
                      m.category_id, c.name AS category_name, \
                      a.serial_number, a.purchase_date, a.warranty_expiry, a.cost, \
                      a.status_id, s.name AS status, a.assigned_to, a.assigned_user_id, \
                      a.notes, a.legacy_type, a.legacy_manufacturer, a.created_at, a.updated_at \
                      FROM assets a \
                      JOIN asset_models m ON m.id = a.model_id \
                      JOIN manufacturers mf ON mf.id = m.manufacturer_id \
                      JOIN categories c ON c.id = m.category_id \
                      JOIN asset_statuses s ON s.id = a.status_id";

/// Filter shared by the list and count queries.
const LIST_FILTER: &str = "WHERE ($1::text IS NULL OR a.id ILIKE $1 OR m.name ILIKE $1 \
                               OR m.model_number ILIKE $1 OR a.serial_number ILIKE $1) \
                           AND ($2::bigint IS NULL OR m.category_id = $2) \
                           AND ($3::text IS NULL OR lower(c.name) = lower($3) \
                               OR lower(a.legacy_type) = lower($3)) \
                           AND ($4::smallint IS NULL OR a.status_id = $4)";

/// Provides ledger operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset under a freshly allocated tag.
    ///
    /// Fails validation on bad fields, an unknown model or legacy names that
    /// disagree with the model, and conflicts on a duplicate serial number.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, DbError> {
        let (input, status) = input.validated()?;

        let mut tx = pool.begin().await?;

        let names = model_names(&mut tx, input.model_id).await?;
        let legacy_type = input
            .legacy_type
            .as_deref()
            .map(|t| project_legacy_name("legacy_type", t, &names.category_name))
            .transpose()?;
        let legacy_manufacturer = input
            .legacy_manufacturer
            .as_deref()
            .map(|m| project_legacy_name("legacy_manufacturer", m, &names.manufacturer_name))
            .transpose()?;

        let (tag_value,): (i64,) = sqlx::query_as(
            "UPDATE id_sequences SET next_value = next_value + 1
             WHERE name = $1
             RETURNING next_value - 1",
        )
        .bind(ASSET_TAG_SEQUENCE)
        .fetch_one(&mut *tx)
        .await?;
        let tag = format_asset_tag(tag_value);

        sqlx::query(
            "INSERT INTO assets
                (id, model_id, serial_number, purchase_date, warranty_expiry, cost, status_id,
                 assigned_to, assigned_user_id, notes, legacy_type, legacy_manufacturer)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&tag)
        .bind(input.model_id)
        .bind(&input.serial_number)
        .bind(input.purchase_date)
        .bind(input.warranty_expiry)
        .bind(input.cost)
        .bind(status.id())
        .bind(&input.assigned_to)
        .bind(input.assigned_user_id)
        .bind(&input.notes)
        .bind(&legacy_type)
        .bind(&legacy_manufacturer)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_serial(e, &input.serial_number))?;

        let asset = fetch_by_id(&mut *tx, &tag)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(asset)
    }

    /// Find an asset by tag.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Asset>, sqlx::Error> {
        fetch_by_id(pool, id).await
    }

    /// Find an asset with its maintenance history.
    pub async fn find_detail(pool: &PgPool, id: &str) -> Result<Option<AssetDetail>, sqlx::Error> {
        let Some(asset) = fetch_by_id(pool, id).await? else {
            return Ok(None);
        };
        let maintenance_history = MaintenanceRepo::list_for_asset(pool, id).await?;
        Ok(Some(AssetDetail {
            asset,
            maintenance_history,
        }))
    }

    /// List one page of the ledger, newest first.
    ///
    /// An unrecognised status filter matches nothing rather than failing.
    pub async fn list(pool: &PgPool, params: &AssetListParams) -> Result<AssetPage, sqlx::Error> {
        let page = clamp_page(params.page);
        let page_size = clamp_limit(params.page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

        let status_id: Option<StatusId> = match params.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match AssetStatus::parse(raw) {
                Some(status) => Some(status.id()),
                None => {
                    return Ok(AssetPage {
                        items: Vec::new(),
                        total: 0,
                        page,
                        page_size,
                    })
                }
            },
        };
        let pattern = params.search.as_deref().and_then(ilike_pattern);
        let type_name = params
            .type_name
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let count_query = format!(
            "SELECT COUNT(*) FROM assets a \
             JOIN asset_models m ON m.id = a.model_id \
             JOIN categories c ON c.id = m.category_id \
             {LIST_FILTER}"
        );
        let (total,): (i64,) = sqlx::query_as(&count_query)
            .bind(&pattern)
            .bind(params.category_id)
            .bind(type_name)
            .bind(status_id)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "{SELECT} {LIST_FILTER} ORDER BY a.created_at DESC, a.id DESC LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, Asset>(&query)
            .bind(&pattern)
            .bind(params.category_id)
            .bind(type_name)
            .bind(status_id)
            .bind(page_size)
            .bind(page_offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(AssetPage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Count every asset in the ledger.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assets")
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Update an asset. Only non-`None` fields in `input` are applied; a
    /// blank `assigned_to` or `notes` clears the field.
    ///
    /// Moving the asset to another model re-points any legacy fields it
    /// carries at the new model's category and manufacturer.
    ///
    /// Returns `None` if no asset with the given tag exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, DbError> {
        let (input, status) = input.validated()?;

        let mut tx = pool.begin().await?;

        let current: Option<(DbId, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT model_id, legacy_type, legacy_manufacturer FROM assets
             WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((current_model, current_type, current_manufacturer)) = current else {
            return Ok(None);
        };

        let model_id = input.model_id.unwrap_or(current_model);
        let model_changed = model_id != current_model;
        let (legacy_type, legacy_manufacturer) = if model_changed
            || input.legacy_type.is_some()
            || input.legacy_manufacturer.is_some()
        {
            let names = model_names(&mut tx, model_id).await?;
            (
                reproject(
                    "legacy_type",
                    input.legacy_type.as_deref(),
                    current_type,
                    model_changed,
                    &names.category_name,
                )?,
                reproject(
                    "legacy_manufacturer",
                    input.legacy_manufacturer.as_deref(),
                    current_manufacturer,
                    model_changed,
                    &names.manufacturer_name,
                )?,
            )
        } else {
            (current_type, current_manufacturer)
        };

        sqlx::query(
            "UPDATE assets SET
                model_id = $2,
                serial_number = COALESCE($3, serial_number),
                purchase_date = COALESCE($4, purchase_date),
                warranty_expiry = COALESCE($5, warranty_expiry),
                cost = COALESCE($6, cost),
                status_id = COALESCE($7, status_id),
                assigned_to = CASE WHEN $8::text IS NULL THEN assigned_to
                                   ELSE NULLIF($8, '') END,
                assigned_user_id = COALESCE($9, assigned_user_id),
                notes = CASE WHEN $10::text IS NULL THEN notes ELSE NULLIF($10, '') END,
                legacy_type = $11,
                legacy_manufacturer = $12
             WHERE id = $1",
        )
        .bind(id)
        .bind(model_id)
        .bind(&input.serial_number)
        .bind(input.purchase_date)
        .bind(input.warranty_expiry)
        .bind(input.cost)
        .bind(status.map(AssetStatus::id))
        .bind(&input.assigned_to)
        .bind(input.assigned_user_id)
        .bind(&input.notes)
        .bind(&legacy_type)
        .bind(&legacy_manufacturer)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_serial(e, input.serial_number.as_deref().unwrap_or_default()))?;

        let asset = fetch_by_id(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    /// Overwrite an asset's status. Any status may move to any other.
    ///
    /// Returns `None` if no asset with the given tag exists.
    pub async fn update_status(
        pool: &PgPool,
        id: &str,
        status: AssetStatus,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let result = sqlx::query("UPDATE assets SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status.id())
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        fetch_by_id(pool, id).await
    }

    /// Permanently delete an asset and its maintenance history.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The `limit` most recently modified assets, newest first.
    pub async fn recent_activity(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let rows: Vec<(String, Option<String>, StatusId, Timestamp)> = sqlx::query_as(
            "SELECT id, assigned_to, status_id, updated_at FROM assets
             ORDER BY updated_at DESC, id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, assigned_to, status_id, updated_at)| {
                AssetStatus::from_id(status_id)
                    .map(|status| ActivityEntry::new(id, assigned_to, status, updated_at))
            })
            .collect())
    }
}

async fn fetch_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: &str,
) -> Result<Option<Asset>, sqlx::Error> {
    let query = format!("{SELECT} WHERE a.id = $1");
    sqlx::query_as::<_, Asset>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Resolve a model's catalog names, failing validation if it does not exist.
async fn model_names(
    tx: &mut Transaction<'_, Postgres>,
    model_id: DbId,
) -> Result<ModelNames, DbError> {
    AssetModelRepo::resolved_names(&mut **tx, model_id)
        .await?
        .ok_or_else(|| CoreError::Validation(format!("Model {model_id} does not exist")).into())
}

/// Decide a legacy field's new value: an explicit value must match the
/// model, an existing value follows a model change, otherwise it is kept.
fn reproject(
    field: &str,
    given: Option<&str>,
    current: Option<String>,
    model_changed: bool,
    resolved: &str,
) -> Result<Option<String>, CoreError> {
    match (given, current) {
        (Some(given), _) => project_legacy_name(field, given, resolved).map(Some),
        (None, Some(_)) if model_changed => Ok(Some(resolved.to_string())),
        (None, current) => Ok(current),
    }
}

fn duplicate_serial(err: sqlx::Error, serial_number: &str) -> DbError {
    unique_violation_as_conflict(err, "uq_assets_serial_number", || {
        format!("An asset with serial number '{serial_number}' already exists")
    })
}
