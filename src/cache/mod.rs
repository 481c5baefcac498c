//! Look-aside cache for student queries
//!
//! The cache is an optional accelerator. Every backend can fail with
//! [`CacheError::Unavailable`]; callers treat that as a miss (on reads) or
//! a no-op (on writes and evictions) and carry on against the store.
//!
//! Entries are grouped by namespace so a whole namespace can be dropped at
//! once. Values are opaque strings; the service stores JSON in them.

mod memory;
mod noop;
mod redis_cache;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryCache;
pub use noop::NoopCache;
pub use redis_cache::RedisCache;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache errors
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backend could not be reached or refused the command
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// The backend could not be set up from its configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

/// Cache contract used by the student service
pub trait StudentCache: Send + Sync {
    /// Fetch a cached value
    fn get(&self, namespace: &str, key: &str) -> CacheResult<Option<String>>;

    /// Store a value, replacing any previous one
    fn put(&self, namespace: &str, key: &str, value: &str) -> CacheResult<()>;

    /// Drop every entry in `namespace`
    fn evict_all(&self, namespace: &str) -> CacheResult<()>;
}

/// Which cache backend to use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum CacheConfig {
    /// No caching; every read goes to the store
    None,
    /// Process-local map
    Memory,
    /// Redis server
    Redis {
        #[serde(default = "default_redis_url")]
        url: String,
        /// Connect, read and write timeout in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_timeout_ms() -> u64 {
    500
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig::Memory
    }
}

impl CacheConfig {
    /// Build the configured backend.
    ///
    /// Redis is connected lazily, so an unreachable server is not an error
    /// here; only a malformed URL is.
    pub fn build(&self) -> CacheResult<Arc<dyn StudentCache>> {
        match self {
            CacheConfig::None => Ok(Arc::new(NoopCache)),
            CacheConfig::Memory => Ok(Arc::new(MemoryCache::new())),
            CacheConfig::Redis { url, timeout_ms } => Ok(Arc::new(RedisCache::new(
                url,
                Duration::from_millis(*timeout_ms),
            )?)),
        }
    }

    /// Short label for logs
    pub fn describe(&self) -> String {
        match self {
            CacheConfig::None => "none".to_string(),
            CacheConfig::Memory => "memory".to_string(),
            CacheConfig::Redis { url, .. } => format!("redis ({})", url),
        }
    }
}
