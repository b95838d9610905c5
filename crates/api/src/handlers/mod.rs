pub mod assets;
pub mod categories;
pub mod manufacturers;
pub mod models;
