pub mod assets;
pub mod categories;
pub mod health;
pub mod manufacturers;
pub mod models;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets                                  list, create
/// /assets/stats                            inventory statistics
/// /assets/recent                           recent activity (?limit=)
/// /assets/{id}                             get, update, delete
/// /assets/{id}/status                      update status (PATCH)
/// /assets/{id}/maintenance                 append maintenance (POST)
///
/// /categories                              list, create
/// /categories/rename                       rename across ledger (PUT)
/// /categories/{id}                         get, update, guarded delete
/// /categories/{id}/references              reference counts, delete safety
///
/// /manufacturers                           list, create
/// /manufacturers/rename                    rename across ledger (PUT)
/// /manufacturers/{id}                      get, update, guarded delete
/// /manufacturers/{id}/references           reference counts, delete safety
/// /manufacturers/{id}/logo                 upload logo (POST, multipart)
///
/// /models                                  list, create
/// /models/{id}                             get, update, guarded delete
/// /models/{id}/references                  reference counts, delete safety
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/assets", assets::router())
        .nest("/categories", categories::router())
        .nest("/manufacturers", manufacturers::router())
        .nest("/models", models::router())
}
