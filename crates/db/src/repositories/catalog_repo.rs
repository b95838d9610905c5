//! Rename and guarded-delete coordination across the catalogs and ledger.
//!
//! Both operations run in a single transaction: the catalog row is locked
//! first, then every dependent row is counted or rewritten, so a crash or
//! concurrent writer can never leave the catalog and the ledger disagreeing.

use itam_core::catalog::{
    check_deletion_safe, validate_rename, CatalogKind, CatalogReferences, DeletionCheck,
};
use itam_core::error::CoreError;
use itam_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{unique_violation_as_conflict, DbError};
use crate::models::catalog::{RenameOutcome, RenameRequest};

/// Where a catalog kind lives and how the ledger points at it.
struct CatalogTable {
    table: &'static str,
    unique_constraint: &'static str,
    /// Foreign key column on `asset_models` (absent for models themselves).
    model_fk: Option<&'static str>,
    /// Free-text column on `assets` carried over from the flat schema.
    legacy_column: Option<&'static str>,
}

fn catalog_table(kind: CatalogKind) -> CatalogTable {
    match kind {
        CatalogKind::Category => CatalogTable {
            table: "categories",
            unique_constraint: "uq_categories_name",
            model_fk: Some("category_id"),
            legacy_column: Some("legacy_type"),
        },
        CatalogKind::Manufacturer => CatalogTable {
            table: "manufacturers",
            unique_constraint: "uq_manufacturers_name",
            model_fk: Some("manufacturer_id"),
            legacy_column: Some("legacy_manufacturer"),
        },
        CatalogKind::Model => CatalogTable {
            table: "asset_models",
            unique_constraint: "uq_asset_models_name",
            model_fk: None,
            legacy_column: None,
        },
    }
}

/// Coordinates catalog renames and deletes with the asset ledger.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Rename a category or manufacturer and rewrite every legacy
    /// reference to it.
    ///
    /// When `old_name` is only a legacy string it may be folded into an
    /// existing entry named `new_name`. Fails with not-found when `old_name`
    /// is neither a catalog entry nor referenced by any asset (so a repeated
    /// rename reports not-found), and with a conflict when `old_name` is an
    /// entry and another entry already uses `new_name`.
    pub async fn rename(
        pool: &PgPool,
        kind: CatalogKind,
        request: &RenameRequest,
    ) -> Result<RenameOutcome, DbError> {
        let target = catalog_table(kind);
        let Some(legacy_column) = target.legacy_column else {
            return Err(CoreError::Validation(format!(
                "{} entries are renamed by updating them directly",
                kind.label()
            ))
            .into());
        };
        let (old_name, new_name) = validate_rename(kind, &request.old_name, &request.new_name)?;

        let mut tx = pool.begin().await?;

        let old_row: Option<(DbId,)> =
            sqlx::query_as(&format!("SELECT id FROM {} WHERE name = $1 FOR UPDATE", target.table))
                .bind(&old_name)
                .fetch_optional(&mut *tx)
                .await?;

        if let Some((id,)) = old_row {
            let clash: Option<(DbId,)> = sqlx::query_as(&format!(
                "SELECT id FROM {} WHERE name = $1 AND id <> $2",
                target.table
            ))
            .bind(&new_name)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
            if clash.is_some() {
                return Err(CoreError::Conflict(format!(
                    "{} '{new_name}' already exists",
                    kind.label()
                ))
                .into());
            }

            sqlx::query(&format!("UPDATE {} SET name = $2 WHERE id = $1", target.table))
                .bind(id)
                .bind(&new_name)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    unique_violation_as_conflict(e, target.unique_constraint, || {
                        format!("{} '{new_name}' already exists", kind.label())
                    })
                })?;
        }

        let rewritten = sqlx::query(&format!(
            "UPDATE assets SET {legacy_column} = $2 WHERE {legacy_column} = $1"
        ))
        .bind(&old_name)
        .bind(&new_name)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if old_row.is_none() && rewritten == 0 {
            return Err(CoreError::not_found(kind.label(), &old_name).into());
        }

        tx.commit().await?;

        tracing::info!(
            kind = kind.label(),
            old_name = %old_name,
            new_name = %new_name,
            legacy_rows_rewritten = rewritten,
            "Catalog entry renamed across ledger",
        );

        Ok(RenameOutcome {
            old_name,
            new_name,
            catalog_entry_renamed: old_row.is_some(),
            legacy_rows_rewritten: rewritten,
        })
    }

    /// Report what still references a catalog entry without changing it.
    ///
    /// Returns `None` if the entry does not exist.
    pub async fn deletion_check(
        pool: &PgPool,
        kind: CatalogKind,
        id: DbId,
    ) -> Result<Option<DeletionCheck>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let check = lock_and_check(&mut tx, kind, id, false).await?;
        tx.rollback().await?;
        Ok(check)
    }

    /// Delete a catalog entry if nothing in the ledger references it.
    ///
    /// Fails with not-found if absent and with a conflict naming the
    /// reference counts if still in use.
    pub async fn delete(pool: &PgPool, kind: CatalogKind, id: DbId) -> Result<(), DbError> {
        let target = catalog_table(kind);
        let mut tx = pool.begin().await?;

        let Some(check) = lock_and_check(&mut tx, kind, id, true).await? else {
            return Err(CoreError::not_found(kind.label(), id).into());
        };
        check.into_result()?;

        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", target.table))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(kind = kind.label(), id, "Catalog entry deleted");
        Ok(())
    }
}

/// Read (and optionally lock) the entry, then count its references.
async fn lock_and_check(
    tx: &mut Transaction<'_, Postgres>,
    kind: CatalogKind,
    id: DbId,
    for_update: bool,
) -> Result<Option<DeletionCheck>, sqlx::Error> {
    let target = catalog_table(kind);
    let lock = if for_update { " FOR UPDATE" } else { "" };

    let row: Option<(String,)> =
        sqlx::query_as(&format!("SELECT name FROM {} WHERE id = $1{lock}", target.table))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
    let Some((name,)) = row else {
        return Ok(None);
    };

    let mut refs = CatalogReferences::default();
    match target.model_fk {
        Some(fk) => {
            let (models, assets): (i64, i64) = sqlx::query_as(&format!(
                "SELECT
                    (SELECT COUNT(*) FROM asset_models WHERE {fk} = $1),
                    (SELECT COUNT(*) FROM assets a
                     JOIN asset_models m ON m.id = a.model_id
                     WHERE m.{fk} = $1)"
            ))
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
            refs.models = models;
            refs.assets = assets;
        }
        None => {
            let (assets,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM assets WHERE model_id = $1")
                    .bind(id)
                    .fetch_one(&mut **tx)
                    .await?;
            refs.assets = assets;
        }
    }
    if let Some(column) = target.legacy_column {
        let (legacy,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM assets WHERE {column} = $1"))
                .bind(&name)
                .fetch_one(&mut **tx)
                .await?;
        refs.legacy_assets = legacy;
    }

    Ok(Some(check_deletion_safe(kind, &name, refs)))
}
