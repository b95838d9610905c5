//! Domain logic for the IT asset inventory.
//!
//! Nothing in this crate touches the database. Repositories in `itam-db`
//! and handlers in `itam-api` pass data in and act on the results.

pub mod activity;
pub mod asset_tag;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod maintenance;
pub mod policy;
pub mod search;
pub mod stats;
pub mod status;
pub mod types;
pub mod upload;
