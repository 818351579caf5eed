//! Organizational hierarchy adapters.

pub mod static_map;

pub use static_map::StaticHierarchy;
