//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /assets/recent`.
///
/// `limit` is kept as raw text so a malformed value surfaces as a
/// validation error rather than a query-string rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RecentActivityParams {
    pub limit: Option<String>,
}

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}
