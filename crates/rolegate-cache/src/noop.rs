//! Cache provider that stores nothing.

use std::time::Duration;

use async_trait::async_trait;

use rolegate_core::result::AppResult;
use rolegate_core::traits::cache::CacheProvider;

/// Provider selected by `cache.provider = "none"`. Every read is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheProvider;

#[async_trait]
impl CacheProvider for NoopCacheProvider {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Ok(())
    }

    async fn set_default(&self, _key: &str, _value: &str) -> AppResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }
}
