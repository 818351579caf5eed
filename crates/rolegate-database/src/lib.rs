//! # rolegate-database
//!
//! Storage for the permission engine: the [`RoleStore`], [`PermissionStore`]
//! and [`CatalogStore`] traits, their PostgreSQL implementations, and an
//! in-memory implementation for tests and development.

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::InMemoryStore;
pub use repositories::{CatalogRepository, RolePermissionRepository, RoleRepository};
pub use store::{CatalogStore, PermissionStore, RoleStore};
