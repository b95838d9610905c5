//! Handlers for the `/models` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use itam_core::catalog::{CatalogKind, DeletionCheck};
use itam_core::error::CoreError;
use itam_core::types::DbId;
use itam_db::models::asset_model::{AssetModel, CreateAssetModel, UpdateAssetModel};
use itam_db::repositories::{AssetModelRepo, CatalogRepo};
use itam_db::retry::with_read_retry;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireCatalogManager, RequireRead};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/models
pub async fn list(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<AssetModel>>>> {
    let models =
        with_read_retry(|| AssetModelRepo::list(&state.pool, params.include_inactive)).await?;
    Ok(Json(DataResponse { data: models }))
}

/// POST /api/v1/models
///
/// The referenced manufacturer and category must exist (400 otherwise).
pub async fn create(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Json(input): Json<CreateAssetModel>,
) -> AppResult<(StatusCode, Json<DataResponse<AssetModel>>)> {
    let model = AssetModelRepo::create(&state.pool, &input).await?;
    tracing::info!(
        model_id = model.id,
        name = %model.name,
        user_id = user.user_id,
        "Model created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: model })))
}

/// GET /api/v1/models/{id}
pub async fn get_by_id(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssetModel>>> {
    let model = with_read_retry(|| AssetModelRepo::find_by_id(&state.pool, id))
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Model", id)))?;
    Ok(Json(DataResponse { data: model }))
}

/// PUT /api/v1/models/{id}
pub async fn update(
    RequireCatalogManager(_user): RequireCatalogManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssetModel>,
) -> AppResult<Json<DataResponse<AssetModel>>> {
    let model = AssetModelRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Model", id)))?;
    Ok(Json(DataResponse { data: model }))
}

/// GET /api/v1/models/{id}/references
///
/// Reports what still references the model and whether it could be
/// deleted right now.
pub async fn references(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletionCheck>>> {
    let check =
        with_read_retry(|| CatalogRepo::deletion_check(&state.pool, CatalogKind::Model, id))
            .await?
            .ok_or(AppError::Core(CoreError::not_found("Model", id)))?;
    Ok(Json(DataResponse { data: check }))
}

/// DELETE /api/v1/models/{id}
///
/// Returns 409 while any asset still references the model.
pub async fn delete(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CatalogRepo::delete(&state.pool, CatalogKind::Model, id).await?;
    tracing::info!(
        model_id = id,
        user_id = user.user_id,
        token_id = %user.token_id,
        "Model deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}
