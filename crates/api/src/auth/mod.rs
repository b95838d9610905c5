//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Credential handling lives in the identity service that issues tokens;
//! this server only verifies them.

pub mod jwt;
