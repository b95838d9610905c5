//! Handlers for the `/assets` resource (the asset ledger).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use itam_core::activity::{validate_recent_limit, ActivityEntry};
use itam_core::error::CoreError;
use itam_core::maintenance::validate_entry;
use itam_core::stats::InventoryStats;
use itam_core::status::AssetStatus;
use itam_db::models::asset::{
    Asset, AssetDetail, AssetListParams, CreateAsset, UpdateAsset, UpdateAssetStatus,
};
use itam_db::models::maintenance::CreateMaintenanceRecord;
use itam_db::repositories::{AssetRepo, MaintenanceRepo, StatsRepo};
use itam_db::retry::with_read_retry;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{
    RequireAppendMaintenance, RequireCreateAsset, RequireDeleteAsset, RequireRead,
    RequireUpdateAsset, RequireUpdateAssetStatus,
};
use crate::query::RecentActivityParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn asset_not_found(id: &str) -> AppError {
    AppError::Core(CoreError::not_found("Asset", id))
}

/// GET /api/v1/assets
///
/// Supports `search`, `category_id`, `type`, `status`, `page`, `page_size`.
pub async fn list(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<Json<PaginatedResponse<Asset>>> {
    let page = with_read_retry(|| AssetRepo::list(&state.pool, &params)).await?;
    Ok(Json(PaginatedResponse::new(
        page.items,
        page.total,
        page.page,
        page.page_size,
    )))
}

/// POST /api/v1/assets
pub async fn create(
    RequireCreateAsset(user): RequireCreateAsset,
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<DataResponse<Asset>>)> {
    let asset = AssetRepo::create(&state.pool, &input).await?;
    tracing::info!(
        asset_id = %asset.id,
        model_id = asset.model_id,
        user_id = user.user_id,
        "Asset created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets/{id}
///
/// Returns the asset with its full maintenance history.
pub async fn get_by_id(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<AssetDetail>>> {
    let detail = with_read_retry(|| AssetRepo::find_detail(&state.pool, &id))
        .await?
        .ok_or_else(|| asset_not_found(&id))?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/assets/{id}
pub async fn update(
    RequireUpdateAsset(user): RequireUpdateAsset,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let asset = AssetRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| asset_not_found(&id))?;
    tracing::info!(asset_id = %id, user_id = user.user_id, "Asset updated");
    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    RequireDeleteAsset(user): RequireDeleteAsset,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !AssetRepo::delete(&state.pool, &id).await? {
        return Err(asset_not_found(&id));
    }
    tracing::info!(
        asset_id = %id,
        user_id = user.user_id,
        token_id = %user.token_id,
        "Asset deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/assets/{id}/status
///
/// Any status may move to any other.
pub async fn update_status(
    RequireUpdateAssetStatus(user): RequireUpdateAssetStatus,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateAssetStatus>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let status = AssetStatus::parse_strict(&input.status)?;
    let asset = AssetRepo::update_status(&state.pool, &id, status)
        .await?
        .ok_or_else(|| asset_not_found(&id))?;
    tracing::info!(
        asset_id = %id,
        status = %status,
        user_id = user.user_id,
        "Asset status changed",
    );
    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets/{id}/maintenance
///
/// Appends a record performed by the caller and returns the updated asset.
pub async fn append_maintenance(
    RequireAppendMaintenance(user): RequireAppendMaintenance,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateMaintenanceRecord>,
) -> AppResult<(StatusCode, Json<DataResponse<AssetDetail>>)> {
    let entry = validate_entry(
        &input.title,
        &input.description,
        input.performed_at,
        chrono::Utc::now(),
    )?;
    let record = MaintenanceRepo::append(&state.pool, &id, &entry, Some(user.user_id))
        .await?
        .ok_or_else(|| asset_not_found(&id))?;
    tracing::info!(
        asset_id = %id,
        record_id = record.id,
        user_id = user.user_id,
        "Maintenance record appended",
    );

    let detail = AssetRepo::find_detail(&state.pool, &id)
        .await?
        .ok_or_else(|| asset_not_found(&id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/assets/stats
pub async fn stats(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<InventoryStats>>> {
    let stats = with_read_retry(|| StatsRepo::compute(&state.pool)).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/assets/recent?limit=5
pub async fn recent_activity(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Query(params): Query<RecentActivityParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityEntry>>>> {
    let limit = validate_recent_limit(params.limit.as_deref())?;
    let entries = with_read_retry(|| AssetRepo::recent_activity(&state.pool, limit)).await?;
    Ok(Json(DataResponse { data: entries }))
}
