//! Recent-activity feed rules.

use serde::Serialize;

use crate::error::CoreError;
use crate::status::AssetStatus;
use crate::types::{Date, Timestamp};

/// Entries returned when the caller gives no limit.
pub const DEFAULT_RECENT_LIMIT: i64 = 5;

/// Upper bound on the feed length.
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Validate the raw `limit` query value.
///
/// Absent means [`DEFAULT_RECENT_LIMIT`]; anything that is not a positive
/// integer is a validation failure; large values are capped at
/// [`MAX_RECENT_LIMIT`].
pub fn validate_recent_limit(raw: Option<&str>) -> Result<i64, CoreError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_RECENT_LIMIT);
    };
    let limit: i64 = raw.trim().parse().map_err(|_| {
        CoreError::Validation(format!("limit must be a positive integer, got '{raw}'"))
    })?;
    if limit < 1 {
        return Err(CoreError::Validation(format!(
            "limit must be a positive integer, got {limit}"
        )));
    }
    Ok(limit.min(MAX_RECENT_LIMIT))
}

/// One entry in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub asset_id: String,
    pub assigned_to: Option<String>,
    pub status: AssetStatus,
    /// Calendar date of the last modification (UTC).
    pub date: Date,
}

impl ActivityEntry {
    pub fn new(
        asset_id: String,
        assigned_to: Option<String>,
        status: AssetStatus,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            asset_id,
            assigned_to,
            status,
            date: updated_at.date_naive(),
        }
    }
}
