//! Permission-set administration.

pub mod service;

pub use service::PermissionService;
