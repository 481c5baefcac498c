//! In-memory record store
//!
//! Used as the test double and for throwaway deployments.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{StoreError, StoreResult, StudentStore};
use crate::student::{NewStudent, Student};

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<i64, Student>,
    last_id: i64,
}

/// A `BTreeMap`-backed store. Ids come from a counter that only grows.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.inner.read()?.records.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl StudentStore for MemoryStore {
    fn insert(&self, candidate: NewStudent) -> StoreResult<Student> {
        let mut inner = self.inner.write()?;
        inner.last_id += 1;
        let student = Student::from_new(inner.last_id, candidate);
        inner.records.insert(student.id, student.clone());
        Ok(student)
    }

    fn save(&self, student: &Student) -> StoreResult<Student> {
        let mut inner = self.inner.write()?;
        match inner.records.get_mut(&student.id) {
            Some(existing) => {
                *existing = student.clone();
                Ok(student.clone())
            }
            None => Err(StoreError::Missing(student.id)),
        }
    }

    fn find_all(&self) -> StoreResult<Vec<Student>> {
        Ok(self.inner.read()?.records.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Student>> {
        Ok(self.inner.read()?.records.get(&id).cloned())
    }

    fn find_by_name_containing_ignore_case(&self, fragment: &str) -> StoreResult<Vec<Student>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .inner
            .read()?
            .records
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn exists_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.read()?.records.contains_key(&id))
    }

    fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        self.inner.write()?.records.remove(&id);
        Ok(())
    }
}
