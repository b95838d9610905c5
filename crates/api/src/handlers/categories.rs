//! Handlers for the `/categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use itam_core::catalog::{CatalogKind, DeletionCheck};
use itam_core::error::CoreError;
use itam_core::types::DbId;
use itam_db::models::catalog::{RenameOutcome, RenameRequest};
use itam_db::models::category::{Category, CreateCategory, UpdateCategory};
use itam_db::repositories::{CatalogRepo, CategoryRepo};
use itam_db::retry::with_read_retry;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireCatalogManager, RequireRead};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories =
        with_read_retry(|| CategoryRepo::list(&state.pool, params.include_inactive)).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(
        category_id = category.id,
        name = %category.name,
        user_id = user.user_id,
        "Category created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = with_read_retry(|| CategoryRepo::find_by_id(&state.pool, id))
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Category", id)))?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
///
/// Updates description and active flag. Names change via `/rename`.
pub async fn update(
    RequireCatalogManager(_user): RequireCatalogManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Category", id)))?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/rename
///
/// Renames the catalog entry and every legacy asset reference in one
/// transaction.
pub async fn rename(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Json(input): Json<RenameRequest>,
) -> AppResult<Json<DataResponse<RenameOutcome>>> {
    let outcome = CatalogRepo::rename(&state.pool, CatalogKind::Category, &input).await?;
    tracing::info!(
        old_name = %outcome.old_name,
        new_name = %outcome.new_name,
        user_id = user.user_id,
        "Category renamed",
    );
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/categories/{id}/references
///
/// Reports what still references the category and whether it could be
/// deleted right now.
pub async fn references(
    RequireRead(_user): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletionCheck>>> {
    let check =
        with_read_retry(|| CatalogRepo::deletion_check(&state.pool, CatalogKind::Category, id))
            .await?
            .ok_or(AppError::Core(CoreError::not_found("Category", id)))?;
    Ok(Json(DataResponse { data: check }))
}

/// DELETE /api/v1/categories/{id}
///
/// Returns 409 while any model or asset still references the category.
pub async fn delete(
    RequireCatalogManager(user): RequireCatalogManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CatalogRepo::delete(&state.pool, CatalogKind::Category, id).await?;
    tracing::info!(
        category_id = id,
        user_id = user.user_id,
        token_id = %user.token_id,
        "Category deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}
