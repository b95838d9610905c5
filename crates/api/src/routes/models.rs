//! Route definitions for the `/models` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::models;
use crate::state::AppState;

/// Routes mounted at `/models`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/references  -> references
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(models::list).post(models::create))
        .route(
            "/{id}",
            get(models::get_by_id)
                .put(models::update)
                .delete(models::delete),
        )
        .route("/{id}/references", get(models::references))
}
