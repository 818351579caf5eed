//! Page permission domain entities.

pub mod decision;
pub mod model;
pub mod scope;

pub use decision::{AccessDecision, Capability};
pub use model::{PagePermission, PermissionSet, RolePermission};
pub use scope::DataScope;
