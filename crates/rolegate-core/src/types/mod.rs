//! Shared value types.

pub mod id;

pub use id::{DepartmentId, PageId, RoleId, UserId};
