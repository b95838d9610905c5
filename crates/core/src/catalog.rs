//! Catalog rules shared by categories, manufacturers and models.
//!
//! Covers name validation, rename validation, and the in-use deletion guard.
//! The guard is applied uniformly to all three catalog kinds: an entry that
//! anything in the ledger still points at cannot be deleted.

use serde::Serialize;

use crate::error::CoreError;

/// Longest catalog name accepted.
pub const MAX_NAME_LEN: usize = 200;

/// Which catalog an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Category,
    Manufacturer,
    Model,
}

impl CatalogKind {
    /// Entity label used in error messages and logs.
    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Category => "Category",
            CatalogKind::Manufacturer => "Manufacturer",
            CatalogKind::Model => "Model",
        }
    }
}

/// Trim and validate a catalog name, returning the trimmed value.
pub fn validate_name(kind: CatalogKind, raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(format!(
            "{} name is required",
            kind.label()
        )));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{} name must be at most {MAX_NAME_LEN} characters",
            kind.label()
        )));
    }
    Ok(name.to_string())
}

/// Validate an `(old, new)` rename pair, returning both trimmed.
pub fn validate_rename(
    kind: CatalogKind,
    old_name: &str,
    new_name: &str,
) -> Result<(String, String), CoreError> {
    if old_name.trim().is_empty() || new_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Both old and new names are required".to_string(),
        ));
    }
    let old_name = validate_name(kind, old_name)?;
    let new_name = validate_name(kind, new_name)?;
    if old_name == new_name {
        return Err(CoreError::Validation(
            "New name must differ from the old name".to_string(),
        ));
    }
    Ok((old_name, new_name))
}

/// Everything in the ledger that still points at a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogReferences {
    /// Models referencing the entry (always 0 for models themselves).
    pub models: i64,
    /// Assets referencing the entry, directly or through a model.
    pub assets: i64,
    /// Assets whose legacy free-text field still names the entry.
    pub legacy_assets: i64,
}

impl CatalogReferences {
    pub fn total(&self) -> i64 {
        self.models + self.assets + self.legacy_assets
    }
}

/// Result of checking whether a catalog entry can safely be deleted.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionCheck {
    /// Whether nothing references the entry.
    pub is_safe: bool,
    pub references: CatalogReferences,
    /// Human-readable summary of the check.
    pub message: String,
}

impl DeletionCheck {
    /// Convert an unsafe check into a conflict error.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_safe {
            Ok(())
        } else {
            Err(CoreError::Conflict(self.message))
        }
    }
}

/// Evaluate whether a catalog entry with the given references can be deleted.
pub fn check_deletion_safe(kind: CatalogKind, name: &str, refs: CatalogReferences) -> DeletionCheck {
    if refs.total() == 0 {
        return DeletionCheck {
            is_safe: true,
            references: refs,
            message: "No references. Safe to delete.".to_string(),
        };
    }

    let mut parts = Vec::new();
    if refs.models > 0 {
        parts.push(format!("{} model(s)", refs.models));
    }
    if refs.assets > 0 {
        parts.push(format!("{} asset(s)", refs.assets));
    }
    if refs.legacy_assets > 0 {
        parts.push(format!("{} legacy asset record(s)", refs.legacy_assets));
    }

    DeletionCheck {
        is_safe: false,
        references: refs,
        message: format!(
            "Cannot delete {} '{name}': still in use by {}",
            kind.label().to_lowercase(),
            parts.join(" and ")
        ),
    }
}
