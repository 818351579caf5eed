//! # rolegate-service
//!
//! Admin permission API for Rolegate. Each service checks the acting
//! user's grants on the role-management page before touching storage, and
//! invalidates cached entries after every committed write.
//!
//! Services follow constructor injection. All dependencies are provided
//! at construction time via `Arc` references. [`AccessServices`] wires the
//! whole set from configuration.

pub mod catalog;
pub mod context;
pub mod engine;
pub mod guard;
pub mod permission;
pub mod role;

pub use catalog::CatalogService;
pub use context::RequestContext;
pub use engine::AccessServices;
pub use guard::AdminGuard;
pub use permission::PermissionService;
pub use role::RoleService;
