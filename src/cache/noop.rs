use super::{CacheResult, StudentCache};

/// Cache that stores nothing. Used when caching is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl StudentCache for NoopCache {
    fn get(&self, _namespace: &str, _key: &str) -> CacheResult<Option<String>> {
        Ok(None) // always miss
    }

    fn put(&self, _namespace: &str, _key: &str, _value: &str) -> CacheResult<()> {
        Ok(())
    }

    fn evict_all(&self, _namespace: &str) -> CacheResult<()> {
        Ok(())
    }
}
