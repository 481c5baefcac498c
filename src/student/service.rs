//! Student service
//!
//! Sits between the HTTP layer and the record store and owns the
//! cache-aside policy:
//!
//! - Reads check the cache first, fall through to the store on a miss, and
//!   populate the cache afterwards if it is reachable.
//! - Every successful mutation evicts the whole `students` namespace, since
//!   any cached list may include or exclude the changed record.
//! - A failing cache is logged and otherwise ignored. A failing store is
//!   returned to the caller.
//! - A read that overlaps a mutation never leaves its result cached: each
//!   eviction bumps an epoch, and a read whose load started in an older
//!   epoch either skips populating or evicts again after its put.
//!
//! All calls block on store and cache I/O.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::errors::{ServiceError, ServiceResult};
use super::model::{NewStudent, Student, StudentPatch};
use crate::cache::{CacheError, StudentCache};
use crate::storage::{StoreResult, StudentStore};

/// Cache namespace holding every student query result
pub const CACHE_NAMESPACE: &str = "students";

/// Cache key for a query shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKey<'a> {
    All,
    NameSearch(&'a str),
}

impl fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::All => write!(f, "all"),
            CacheKey::NameSearch(name) => write!(f, "name:{}", name),
        }
    }
}

/// Cache lookup outcome
enum Lookup {
    Hit(Vec<Student>),
    Miss,
    /// The cache could not be reached; skip populating it
    Unavailable,
}

/// Business operations on student records
pub struct StudentService {
    store: Arc<dyn StudentStore>,
    cache: Arc<dyn StudentCache>,
    /// Bumped by every mutation before it evicts
    epoch: AtomicU64,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>, cache: Arc<dyn StudentCache>) -> Self {
        Self {
            store,
            cache,
            epoch: AtomicU64::new(0),
        }
    }

    /// Persist a new student and return it with its id
    pub fn create_student(&self, candidate: NewStudent) -> ServiceResult<Student> {
        let student = self.store.insert(candidate)?;
        info!(id = student.id, "student created");
        self.evict_all();
        Ok(student)
    }

    /// Every student, ascending by id
    pub fn get_all_students(&self) -> ServiceResult<Vec<Student>> {
        self.cached(CacheKey::All, || self.store.find_all())
    }

    /// Students whose name contains `name`, ignoring case
    pub fn search_students_by_name(&self, name: &str) -> ServiceResult<Vec<Student>> {
        self.cached(CacheKey::NameSearch(name), || {
            self.store.find_by_name_containing_ignore_case(name)
        })
    }

    /// Merge `patch` into student `id`.
    ///
    /// Absent and blank fields keep their stored value.
    pub fn update_student(&self, id: i64, patch: StudentPatch) -> ServiceResult<Student> {
        let mut student = self
            .store
            .find_by_id(id)?
            .ok_or(ServiceError::NotFound(id))?;

        student.apply(patch);
        let student = self.store.save(&student)?;
        info!(id, "student updated");
        self.evict_all();
        Ok(student)
    }

    /// Remove student `id`
    pub fn delete_student(&self, id: i64) -> ServiceResult<()> {
        if !self.store.exists_by_id(id)? {
            return Err(ServiceError::NotFound(id));
        }
        self.store.delete_by_id(id)?;
        info!(id, "student deleted");
        self.evict_all();
        Ok(())
    }

    fn cached<F>(&self, key: CacheKey<'_>, load: F) -> ServiceResult<Vec<Student>>
    where
        F: FnOnce() -> StoreResult<Vec<Student>>,
    {
        let key = key.to_string();
        let reachable = match self.lookup(&key) {
            Lookup::Hit(students) => {
                debug!(%key, "cache hit");
                return Ok(students);
            }
            Lookup::Miss => true,
            Lookup::Unavailable => false,
        };

        let started = self.epoch.load(Ordering::SeqCst);
        let students = load()?;

        if reachable {
            if self.epoch.load(Ordering::SeqCst) != started {
                debug!(%key, "store changed during load, not caching");
                return Ok(students);
            }
            debug!(%key, count = students.len(), "cache miss, populating");
            self.populate(&key, &students);

            // A mutation may have evicted between the check and the put.
            if self.epoch.load(Ordering::SeqCst) != started {
                debug!(%key, "store changed while caching, evicting");
                self.evict_namespace();
            }
        }
        Ok(students)
    }

    fn lookup(&self, key: &str) -> Lookup {
        match self.cache.get(CACHE_NAMESPACE, key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(students) => Lookup::Hit(students),
                Err(e) => {
                    warn!(%key, error = %e, "discarding undecodable cache entry");
                    Lookup::Miss
                }
            },
            Ok(None) => Lookup::Miss,
            Err(e) => {
                log_cache_failure(&e, "falling back to store");
                Lookup::Unavailable
            }
        }
    }

    fn populate(&self, key: &str, students: &[Student]) {
        let raw = match serde_json::to_string(students) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%key, error = %e, "could not encode cache entry");
                return;
            }
        };
        if let Err(e) = self.cache.put(CACHE_NAMESPACE, key, &raw) {
            log_cache_failure(&e, "result not cached");
        }
    }

    fn evict_all(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.evict_namespace();
    }

    fn evict_namespace(&self) {
        if let Err(e) = self.cache.evict_all(CACHE_NAMESPACE) {
            log_cache_failure(&e, "cached queries may be stale");
        }
    }
}

fn log_cache_failure(err: &CacheError, consequence: &str) {
    warn!(error = %err, "cache failure, {}", consequence);
}
