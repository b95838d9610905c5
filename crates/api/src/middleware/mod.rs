//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated principal from a JWT Bearer token.
//! - [`rbac`] -- One extractor per policy action, backed by `itam_core::policy`.

pub mod auth;
pub mod rbac;
