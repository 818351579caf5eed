//! PostgreSQL implementations of the storage traits.

pub mod catalog;
pub mod permission;
pub mod role;

pub use catalog::CatalogRepository;
pub use permission::RolePermissionRepository;
pub use role::RoleRepository;
