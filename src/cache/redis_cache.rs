//! Redis cache backend
//!
//! Keys are laid out as `<namespace>::<key>`. Commands run on connections
//! checked out of an r2d2 pool, so a slow or unreachable server only holds
//! up the requests that are actually waiting on it. No connection is made
//! until the first command; while the server is down every call fails with
//! [`CacheError::Unavailable`] once the pool's checkout timeout expires.

use std::time::Duration;

use r2d2::{CustomizeConnection, Pool};
use redis::{Client, Commands, Connection, RedisError};

use super::{CacheError, CacheResult, StudentCache};

const MAX_CONNECTIONS: u32 = 8;

/// Cache stored in a Redis server
pub struct RedisCache {
    pool: Pool<Client>,
}

/// Applies the read and write timeout to every new connection
#[derive(Debug)]
struct IoTimeouts(Duration);

impl CustomizeConnection<Connection, RedisError> for IoTimeouts {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), RedisError> {
        conn.set_read_timeout(Some(self.0))?;
        conn.set_write_timeout(Some(self.0))
    }
}

impl RedisCache {
    /// Parse the URL. No connection is made until the first command.
    pub fn new(url: &str, timeout: Duration) -> CacheResult<Self> {
        let client = Client::open(url).map_err(|e| CacheError::InvalidConfig(e.to_string()))?;
        let pool = Pool::builder()
            .max_size(MAX_CONNECTIONS)
            .min_idle(Some(0))
            .connection_timeout(timeout)
            .connection_customizer(Box::new(IoTimeouts(timeout)))
            .build_unchecked(client);
        Ok(Self { pool })
    }

    fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> Result<T, RedisError>,
    ) -> CacheResult<T> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        op(&mut *conn).map_err(unavailable)
    }
}

fn unavailable(err: RedisError) -> CacheError {
    CacheError::Unavailable(err.to_string())
}

fn entry_key(namespace: &str, key: &str) -> String {
    format!("{}::{}", namespace, key)
}

impl StudentCache for RedisCache {
    fn get(&self, namespace: &str, key: &str) -> CacheResult<Option<String>> {
        let key = entry_key(namespace, key);
        self.with_connection(|conn| conn.get(&key))
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> CacheResult<()> {
        let key = entry_key(namespace, key);
        self.with_connection(|conn| conn.set(&key, value))
    }

    fn evict_all(&self, namespace: &str) -> CacheResult<()> {
        // SCAN instead of KEYS so a shared server is not blocked.
        let pattern = entry_key(namespace, "*");
        self.with_connection(|conn| {
            let keys: Vec<String> = conn.scan_match::<_, String>(&pattern)?.collect();
            if keys.is_empty() {
                return Ok(());
            }
            conn.del(keys)
        })
    }
}
