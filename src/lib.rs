//! Rolegate: role-based page permissions with most-permissive merging.
//!
//! Re-exports the member crates so embedders depend on one package.
//! Build an [`AccessServices`] from an [`AppConfig`], a store and a
//! [`HierarchyLookup`], then call its resolver on every request.

pub use rolegate_auth as auth;
pub use rolegate_cache as cache;
pub use rolegate_database as database;
pub use rolegate_entity as entity;
pub use rolegate_service as service;

pub use rolegate_auth::{PageAccess, StaticHierarchy};
pub use rolegate_cache::CacheManager;
pub use rolegate_core::config::AppConfig;
pub use rolegate_core::error::{AppError, ErrorKind};
pub use rolegate_core::result::AppResult;
pub use rolegate_core::traits::HierarchyLookup;
pub use rolegate_core::types::{DepartmentId, PageId, RoleId, UserId};
pub use rolegate_database::{CatalogStore, InMemoryStore, PermissionStore, RoleStore};
pub use rolegate_entity::{AccessDecision, Capability, DataScope, PagePermission, PermissionSet};
pub use rolegate_service::{AccessServices, RequestContext};
