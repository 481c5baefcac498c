//! Process-local cache

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CacheError, CacheResult, StudentCache};

type Namespaces = HashMap<String, HashMap<String, String>>;

/// Namespace -> key -> value map behind a `RwLock`
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<Namespaces>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held in `namespace`
    pub fn len(&self, namespace: &str) -> usize {
        self.entries
            .read()
            .map(|entries| entries.get(namespace).map_or(0, HashMap::len))
            .unwrap_or(0)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CacheError {
    CacheError::Unavailable("memory cache lock poisoned".to_string())
}

impl StudentCache for MemoryCache {
    fn get(&self, namespace: &str, key: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(namespace).and_then(|ns| ns.get(key)).cloned())
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn evict_all(&self, namespace: &str) -> CacheResult<()> {
        self.entries.write().map_err(poisoned)?.remove(namespace);
        Ok(())
    }
}
