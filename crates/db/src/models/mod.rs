//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod asset;
pub mod asset_model;
pub mod catalog;
pub mod category;
pub mod maintenance;
pub mod manufacturer;
