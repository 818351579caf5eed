//! Core traits defined in `rolegate-core` and implemented by other crates
//! or by the embedding application.

pub mod cache;
pub mod hierarchy;

pub use cache::CacheProvider;
pub use hierarchy::HierarchyLookup;
