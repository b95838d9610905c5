//! Route definitions for the `/assets` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /stats               -> stats
/// GET    /recent              -> recent_activity
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// PATCH  /{id}/status         -> update_status
/// POST   /{id}/maintenance    -> append_maintenance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list).post(assets::create))
        .route("/stats", get(assets::stats))
        .route("/recent", get(assets::recent_activity))
        .route(
            "/{id}",
            get(assets::get_by_id)
                .put(assets::update)
                .delete(assets::delete),
        )
        .route("/{id}/status", patch(assets::update_status))
        .route("/{id}/maintenance", post(assets::append_maintenance))
}
