//! Repository for the `manufacturers` table.

use itam_core::catalog::{validate_name, CatalogKind};
use itam_core::types::DbId;
use sqlx::PgPool;

use crate::error::{unique_violation_as_conflict, DbError};
use crate::models::manufacturer::{CreateManufacturer, Manufacturer, UpdateManufacturer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, logo_path, contact_email, contact_phone, contact_address, \
                       is_active, created_at, updated_at";

/// Provides CRUD operations for manufacturers.
pub struct ManufacturerRepo;

impl ManufacturerRepo {
    /// Insert a new manufacturer. Fails with a conflict if the name is taken.
    pub async fn create(
        pool: &PgPool,
        input: &CreateManufacturer,
    ) -> Result<Manufacturer, DbError> {
        let name = validate_name(CatalogKind::Manufacturer, &input.name)?;
        let query = format!(
            "INSERT INTO manufacturers
                (name, contact_email, contact_phone, contact_address, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(&name)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.contact_address)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                unique_violation_as_conflict(e, "uq_manufacturers_name", || {
                    format!("Manufacturer '{name}' already exists")
                })
            })
    }

    /// Find a manufacturer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Manufacturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manufacturers WHERE id = $1");
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List manufacturers ordered by name. Inactive rows only when requested.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<Manufacturer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM manufacturers
             WHERE ($1 OR is_active)
             ORDER BY name"
        );
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a manufacturer. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateManufacturer,
    ) -> Result<Option<Manufacturer>, sqlx::Error> {
        let query = format!(
            "UPDATE manufacturers SET
                contact_email = COALESCE($2, contact_email),
                contact_phone = COALESCE($3, contact_phone),
                contact_address = COALESCE($4, contact_address),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(id)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.contact_address)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Point a manufacturer at a stored logo, returning the updated row and
    /// the logo path it replaced. Returns `None` if absent.
    pub async fn replace_logo_path(
        pool: &PgPool,
        id: DbId,
        logo_path: &str,
    ) -> Result<Option<(Manufacturer, Option<String>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<(Option<String>,)> =
            sqlx::query_as("SELECT logo_path FROM manufacturers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((previous,)) = previous else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE manufacturers SET logo_path = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let manufacturer = sqlx::query_as::<_, Manufacturer>(&query)
            .bind(id)
            .bind(logo_path)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some((manufacturer, previous)))
    }
}
