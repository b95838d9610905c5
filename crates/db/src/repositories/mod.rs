//! Repository layer: one zero-sized struct per table (or coordinated
//! operation), each exposing async functions that take the pool.

pub mod asset_model_repo;
pub mod asset_repo;
pub mod catalog_repo;
pub mod category_repo;
pub mod maintenance_repo;
pub mod manufacturer_repo;
pub mod stats_repo;

pub use asset_model_repo::AssetModelRepo;
pub use asset_repo::AssetRepo;
pub use catalog_repo::CatalogRepo;
pub use category_repo::CategoryRepo;
pub use maintenance_repo::MaintenanceRepo;
pub use manufacturer_repo::ManufacturerRepo;
pub use stats_repo::StatsRepo;
