//! # rolegate-entity
//!
//! Domain entity models for Rolegate. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod catalog;
pub mod permission;
pub mod role;

pub use catalog::{Catalog, Department, Page};
pub use permission::{AccessDecision, Capability, DataScope, PagePermission, PermissionSet, RolePermission};
pub use role::{CreateRole, Role, UpdateRole};
