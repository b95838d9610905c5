//! Liveness and readiness check mounted at `/health`, outside `/api/v1`.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use itam_db::LedgerSnapshot;
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the ledger is readable, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    /// Absent while the database is unreachable.
    pub ledger: Option<LedgerSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    pub latency_ms: u128,
}

/// Answers 200 with ledger figures when the database responds and 503
/// otherwise, so load balancers stop routing to an instance that has lost
/// its pool.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let ledger = match itam_db::ledger_snapshot(&state.pool).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read the ledger");
            None
        }
    };
    let database = DatabaseHealth {
        reachable: ledger.is_some(),
        latency_ms: started.elapsed().as_millis(),
    };

    let (code, status) = if database.reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
            ledger,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
