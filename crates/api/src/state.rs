use std::sync::Arc;

use itam_core::upload::UploadStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: itam_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Storage for uploaded files (manufacturer logos).
    pub upload_store: Arc<dyn UploadStore>,
}
