//! Role names and the declarative role-permission table.
//!
//! Every mutating entry point names the [`Action`] it performs and asks
//! [`authorize`] whether the caller's role may perform it. The table below is
//! the single place where role rules live; the HTTP layer never hard-codes
//! role names.

use serde::Serialize;

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_USER: &str = "user";

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ReadInventory,
    CreateAsset,
    UpdateAsset,
    UpdateAssetStatus,
    AppendMaintenance,
    DeleteAsset,
    ManageCatalog,
}

/// Which roles may perform each action.
pub const POLICY: &[(Action, &[&str])] = &[
    (Action::ReadInventory, &[ROLE_ADMIN, ROLE_MANAGER, ROLE_USER]),
    (Action::CreateAsset, &[ROLE_ADMIN, ROLE_MANAGER, ROLE_USER]),
    (Action::UpdateAsset, &[ROLE_ADMIN, ROLE_MANAGER]),
    (Action::UpdateAssetStatus, &[ROLE_ADMIN, ROLE_MANAGER]),
    (Action::AppendMaintenance, &[ROLE_ADMIN, ROLE_MANAGER]),
    (Action::DeleteAsset, &[ROLE_ADMIN]),
    (Action::ManageCatalog, &[ROLE_ADMIN, ROLE_MANAGER]),
];

/// Roles permitted to perform `action`. Unlisted actions permit nobody.
pub fn allowed_roles(action: Action) -> &'static [&'static str] {
    POLICY
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, roles)| *roles)
        .unwrap_or(&[])
}

/// Whether `role` may perform `action`. Role names match case-insensitively.
pub fn is_permitted(role: &str, action: Action) -> bool {
    allowed_roles(action)
        .iter()
        .any(|r| r.eq_ignore_ascii_case(role))
}

/// Fail with [`CoreError::Forbidden`] unless `role` may perform `action`.
pub fn authorize(role: &str, action: Action) -> Result<(), CoreError> {
    if is_permitted(role, action) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' may not perform {action:?}; requires one of: {}",
            allowed_roles(action).join(", ")
        )))
    }
}
