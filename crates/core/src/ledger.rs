//! Field rules for asset records in the ledger.

use crate::error::CoreError;

/// Validate a serial number, returning it trimmed.
pub fn validate_serial_number(raw: &str) -> Result<String, CoreError> {
    let serial = raw.trim();
    if serial.is_empty() {
        return Err(CoreError::Validation("Serial number is required".to_string()));
    }
    Ok(serial.to_string())
}

/// Validate an optional purchase cost (must be finite and non-negative).
pub fn validate_cost(cost: Option<f64>) -> Result<(), CoreError> {
    match cost {
        Some(c) if !c.is_finite() => Err(CoreError::Validation(
            "Cost must be a finite number".to_string(),
        )),
        Some(c) if c < 0.0 => Err(CoreError::Validation(format!(
            "Cost must be zero or greater, got {c}"
        ))),
        _ => Ok(()),
    }
}

/// Normalize an optional free-text field: trimmed, with blanks becoming `None`.
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Check a caller-supplied legacy catalog name against the name the
/// asset's model actually resolves to, returning the canonical spelling.
///
/// Legacy fields mirror the referenced catalog entry; they may differ in
/// case or whitespace but never name a different entry.
pub fn project_legacy_name(
    field: &str,
    given: &str,
    resolved: &str,
) -> Result<String, CoreError> {
    if given.trim().eq_ignore_ascii_case(resolved) {
        Ok(resolved.to_string())
    } else {
        Err(CoreError::Validation(format!(
            "{field} '{}' does not match the model's '{resolved}'",
            given.trim()
        )))
    }
}
