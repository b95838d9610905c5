//! Policy-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and asks [`itam_core::policy::authorize`]
//! whether the principal's role may perform one [`Action`]. Handlers name the
//! action through the extractor type, so role rules live only in the policy
//! table.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use itam_core::policy::{authorize, Action};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! define_policy_extractor {
    ($(#[$meta:meta])* $name:ident => $action:expr) => {
        $(#[$meta])*
        pub struct $name(pub AuthUser);

        impl $name {
            /// The policy action this extractor enforces.
            pub const ACTION: Action = $action;
        }

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                authorize(&user.role, Self::ACTION)?;
                Ok($name(user))
            }
        }
    };
}

define_policy_extractor! {
    /// Any role that may read the inventory.
    ///
    /// ```ignore
    /// async fn list(RequireRead(_user): RequireRead) -> AppResult<Json<()>> {
    ///     Ok(Json(()))
    /// }
    /// ```
    RequireRead => Action::ReadInventory
}

define_policy_extractor! {
    /// Roles that may register new assets.
    RequireCreateAsset => Action::CreateAsset
}

define_policy_extractor! {
    /// Roles that may edit asset fields.
    RequireUpdateAsset => Action::UpdateAsset
}

define_policy_extractor! {
    /// Roles that may change an asset's status.
    RequireUpdateAssetStatus => Action::UpdateAssetStatus
}

define_policy_extractor! {
    /// Roles that may append maintenance records.
    RequireAppendMaintenance => Action::AppendMaintenance
}

define_policy_extractor! {
    /// Roles that may delete assets.
    RequireDeleteAsset => Action::DeleteAsset
}

define_policy_extractor! {
    /// Roles that may create, update, rename and delete catalog entries.
    RequireCatalogManager => Action::ManageCatalog
}
