//! # rolegate-core
//!
//! Core crate for Rolegate. Contains the unified error system, configuration
//! schemas, typed identifiers, and the traits implemented by the cache and
//! hierarchy adapters.
//!
//! This crate has **no** internal dependencies on other Rolegate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
