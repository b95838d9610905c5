//! Handlers for the `/manufacturers` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use itam_core::catalog::{CatalogKind, DeletionCheck};
use itam_core::error::CoreError;
use itam_core::types::DbId;
use itam_core::upload::{UploadedFile, MANUFACTURER_LOGO_FOLDER};
use itam_db::models::catalog::{RenameOutcome, RenameRequest};
use itam_db::models::manufacturer::{CreateManufacturer, Manufacturer, UpdateManufacturer};
use itam_db::repositories::{CatalogRepo, ManufacturerRepo};
use itam_db::retry::with_read_retry;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireCatalogManager, RequireRead};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the logo file.
const LOGO_FIELD: &str = "logo_image";

/// GET /api/v1/manufacturers
pub async fn list(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Manufacturer>>>> {
    let manufacturers =
        with_read_retry(|| ManufacturerRepo::list(&state.pool, params.include_inactive)).await?;
    Ok(Json(DataResponse {
        data: manufacturers,
    }))
}

/// POST /api/v1/manufacturers
pub async fn create(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Json(input): Json<CreateManufacturer>,
) -> AppResult<(StatusCode, Json<DataResponse<Manufacturer>>)> {
    let manufacturer = ManufacturerRepo::create(&state.pool, &input).await?;
    tracing::info!(
        manufacturer_id = manufacturer.id,
        name = %manufacturer.name,
        user_id = user.user_id,
        "Manufacturer created",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: manufacturer }),
    ))
}

/// GET /api/v1/manufacturers/{id}
pub async fn get_by_id(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Manufacturer>>> {
    let manufacturer = with_read_retry(|| ManufacturerRepo::find_by_id(&state.pool, id))
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Manufacturer", id)))?;
    Ok(Json(DataResponse { data: manufacturer }))
}

/// PUT /api/v1/manufacturers/{id}
///
/// Updates contact info and active flag. Names change via `/rename`.
pub async fn update(
    RequireCatalogManager(_user): RequireCatalogManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateManufacturer>,
) -> AppResult<Json<DataResponse<Manufacturer>>> {
    let manufacturer = ManufacturerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Manufacturer", id)))?;
    Ok(Json(DataResponse { data: manufacturer }))
}

/// PUT /api/v1/manufacturers/rename
pub async fn rename(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Json(input): Json<RenameRequest>,
) -> AppResult<Json<DataResponse<RenameOutcome>>> {
    let outcome = CatalogRepo::rename(&state.pool, CatalogKind::Manufacturer, &input).await?;
    tracing::info!(
        old_name = %outcome.old_name,
        new_name = %outcome.new_name,
        user_id = user.user_id,
        "Manufacturer renamed",
    );
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/manufacturers/{id}/references
///
/// Reports what still references the manufacturer and whether it could be
/// deleted right now.
pub async fn references(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletionCheck>>> {
    let check =
        with_read_retry(|| CatalogRepo::deletion_check(&state.pool, CatalogKind::Manufacturer, id))
            .await?
            .ok_or(AppError::Core(CoreError::not_found("Manufacturer", id)))?;
    Ok(Json(DataResponse { data: check }))
}

/// DELETE /api/v1/manufacturers/{id}
///
/// Returns 409 while any model or asset still references the manufacturer.
pub async fn delete(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let logo_path = ManufacturerRepo::find_by_id(&state.pool, id)
        .await?
        .and_then(|m| m.logo_path);
    CatalogRepo::delete(&state.pool, CatalogKind::Manufacturer, id).await?;
    if let Some(logo_path) = logo_path {
        discard_logo(&state, &logo_path).await;
    }
    tracing::info!(
        manufacturer_id = id,
        user_id = user.user_id,
        token_id = %user.token_id,
        "Manufacturer deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/manufacturers/{id}/logo
///
/// Accepts `multipart/form-data` with a `logo_image` file field. The file
/// is validated and stored by the upload store; only the returned public
/// path is persisted. The logo it replaces is removed from the store, as is
/// the new file if the row cannot be updated.
pub async fn upload_logo(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Manufacturer>>> {
    ManufacturerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Manufacturer", id)))?;

    let mut upload: Option<UploadedFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(LOGO_FIELD) {
            continue; // ignore unknown fields
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let file = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing required '{LOGO_FIELD}' field"))
    })?;

    let logo_path = state
        .upload_store
        .store(MANUFACTURER_LOGO_FOLDER, &format!("manufacturer-{id}"), file)
        .await?;

    let stored = ManufacturerRepo::replace_logo_path(&state.pool, id, &logo_path).await;
    let (manufacturer, previous) = match stored {
        Ok(Some(replaced)) => replaced,
        Ok(None) => {
            discard_logo(&state, &logo_path).await;
            return Err(AppError::Core(CoreError::not_found("Manufacturer", id)));
        }
        Err(e) => {
            discard_logo(&state, &logo_path).await;
            return Err(e.into());
        }
    };
    if let Some(previous) = previous.filter(|p| *p != logo_path) {
        discard_logo(&state, &previous).await;
    }

    tracing::info!(
        manufacturer_id = id,
        logo_path = %logo_path,
        user_id = user.user_id,
        "Manufacturer logo uploaded",
    );
    Ok(Json(DataResponse { data: manufacturer }))
}

/// Remove a stored logo that no row points at any more. Failures are
/// logged and otherwise ignored; the database is already consistent.
async fn discard_logo(state: &AppState, logo_path: &str) {
    if let Err(e) = state.upload_store.remove(logo_path).await {
        tracing::warn!(logo_path = %logo_path, error = %e, "Failed to remove stale logo");
    }
}
