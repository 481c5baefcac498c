//! Record store for student records
//!
//! The store is the durable source of truth. The service layer only talks
//! to it through [`StudentStore`], so the backend can be swapped between
//! the SQLite store and the in-memory double.
//!
//! # Guarantees
//!
//! - Ids are assigned by the store and never reused after a delete
//! - `find_all` and name searches return records in ascending id order
//! - Name search is an unanchored, case-insensitive substring match

mod errors;
mod memory;
mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::student::{NewStudent, Student};

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence contract for student records
pub trait StudentStore: Send + Sync {
    /// Persist a new record and return it with its assigned id
    fn insert(&self, candidate: NewStudent) -> StoreResult<Student>;

    /// Overwrite an existing record.
    ///
    /// Fails with [`StoreError::Missing`] if the id is gone.
    fn save(&self, student: &Student) -> StoreResult<Student>;

    /// All records, ascending by id
    fn find_all(&self) -> StoreResult<Vec<Student>>;

    /// Look up one record
    fn find_by_id(&self, id: i64) -> StoreResult<Option<Student>>;

    /// Records whose name contains `fragment`, ignoring case
    fn find_by_name_containing_ignore_case(&self, fragment: &str) -> StoreResult<Vec<Student>>;

    /// Whether a record with `id` exists
    fn exists_by_id(&self, id: i64) -> StoreResult<bool>;

    /// Remove a record. Removing an absent id is not an error.
    fn delete_by_id(&self, id: i64) -> StoreResult<()>;
}

/// Which store backend to open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local, lost on restart
    Memory,
    /// SQLite database file
    Sqlite {
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,
    },
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("./students.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

impl StoreConfig {
    /// Open the configured backend
    pub fn open(&self) -> StoreResult<Arc<dyn StudentStore>> {
        match self {
            StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreConfig::Sqlite { path } => Ok(Arc::new(SqliteStore::open(path)?)),
        }
    }

    /// Short label for logs
    pub fn describe(&self) -> String {
        match self {
            StoreConfig::Memory => "memory".to_string(),
            StoreConfig::Sqlite { path } => format!("sqlite ({})", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sqlite() {
        assert_eq!(
            StoreConfig::default(),
            StoreConfig::Sqlite {
                path: PathBuf::from("./students.db")
            }
        );
    }

    #[test]
    fn test_config_parses_backend_tag() {
        let config: StoreConfig = serde_json::from_str(r#"{"backend":"memory"}"#).unwrap();
        assert_eq!(config, StoreConfig::Memory);

        let config: StoreConfig =
            serde_json::from_str(r#"{"backend":"sqlite","path":"/tmp/x.db"}"#).unwrap();
        assert_eq!(
            config,
            StoreConfig::Sqlite {
                path: PathBuf::from("/tmp/x.db")
            }
        );
    }

    #[test]
    fn test_open_memory() {
        let store = StoreConfig::Memory.open().unwrap();
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_open_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::Sqlite {
            path: dir.path().join("nested").join("students.db"),
        };
        let store = config.open().unwrap();
        assert!(!store.exists_by_id(1).unwrap());
        assert!(config.describe().starts_with("sqlite"));
    }
}
