//! Route definitions for the `/manufacturers` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use itam_core::upload::MAX_UPLOAD_BYTES;

use crate::handlers::manufacturers;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/manufacturers`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// PUT    /rename           -> rename
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/references  -> references
/// POST   /{id}/logo        -> upload_logo (multipart, field `logo_image`)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(manufacturers::list).post(manufacturers::create))
        .route("/rename", put(manufacturers::rename))
        .route(
            "/{id}",
            get(manufacturers::get_by_id)
                .put(manufacturers::update)
                .delete(manufacturers::delete),
        )
        .route("/{id}/references", get(manufacturers::references))
        .route(
            "/{id}/logo",
            post(manufacturers::upload_logo)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
}
