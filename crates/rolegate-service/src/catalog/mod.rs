//! Catalog reference data for the admin screens.

pub mod service;

pub use service::CatalogService;
