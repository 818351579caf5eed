//! # rolegate-cache
//!
//! Cache provider implementations for Rolegate. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//! - **none**: Every read misses; writes are discarded
//!
//! The provider is selected at runtime based on configuration. Cached data
//! is derived: losing any entry only costs a storage read.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod noop;
pub mod provider;

pub use noop::NoopCacheProvider;
pub use provider::CacheManager;
