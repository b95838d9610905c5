//! DTOs for catalog-wide coordinator operations.

use serde::{Deserialize, Serialize};

/// Request body for renaming a category or manufacturer across the ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    pub old_name: String,
    pub new_name: String,
}

/// What a rename changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    pub old_name: String,
    pub new_name: String,
    /// Whether a catalog row carried the old name.
    pub catalog_entry_renamed: bool,
    /// Assets whose legacy free-text field was rewritten.
    pub legacy_rows_rewritten: u64,
}
