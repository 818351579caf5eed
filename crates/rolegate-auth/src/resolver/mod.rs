//! Effective permission resolution and data-scope enforcement.

pub mod cache;
pub mod engine;
pub mod scope;

pub use cache::PermissionCache;
pub use engine::{PageAccess, PermissionResolver, require_capability};
pub use scope::ScopeChecker;
