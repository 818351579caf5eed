//! # rolegate-auth
//!
//! Request-time authorization for Rolegate.
//!
//! ## Modules
//!
//! - `resolver`: effective page access from a user's roles, with a
//!   read-through cache of roles and permission sets
//! - `hierarchy`: organizational hierarchy adapters consumed by `subordinates` scope checks

pub mod hierarchy;
pub mod resolver;

pub use hierarchy::StaticHierarchy;
pub use resolver::{PageAccess, PermissionCache, PermissionResolver, ScopeChecker, require_capability};
