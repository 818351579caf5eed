//! Role lifecycle administration.

pub mod service;

pub use service::RoleService;
