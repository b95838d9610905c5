//! Maintenance-history validation.
//!
//! Maintenance records are append-only: there is no update or delete path
//! anywhere in the system, and history order is insertion order.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Longest accepted maintenance title.
pub const MAX_TITLE_LEN: usize = 200;

/// A maintenance entry after validation, ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceEntry {
    pub title: String,
    pub description: String,
    pub performed_at: Timestamp,
}

/// Validate a maintenance entry. `performed_at` defaults to `now`.
pub fn validate_entry(
    title: &str,
    description: &str,
    performed_at: Option<Timestamp>,
    now: Timestamp,
) -> Result<MaintenanceEntry, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation(
            "Maintenance title is required".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Maintenance title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(CoreError::Validation(
            "Maintenance description is required".to_string(),
        ));
    }

    Ok(MaintenanceEntry {
        title: title.to_string(),
        description: description.to_string(),
        performed_at: performed_at.unwrap_or(now),
    })
}
