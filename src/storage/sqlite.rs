//! SQLite record store
//!
//! One connection behind a mutex. The table enforces the same field
//! constraints as request validation, so a bad row cannot be written even
//! if validation is bypassed.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{StoreError, StoreResult, StudentStore};
use crate::student::{NewStudent, Student};

/// AUTOINCREMENT keeps deleted ids from being handed out again.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS students (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT    NOT NULL CHECK (length(trim(name)) > 0),
    age          INTEGER NOT NULL CHECK (age BETWEEN 5 AND 100),
    class_name   TEXT    NOT NULL CHECK (length(trim(class_name)) > 0),
    phone_number TEXT    NOT NULL CHECK (length(phone_number) = 10 AND phone_number NOT GLOB '*[^0-9]*')
);
";

const SELECT_COLUMNS: &str = "SELECT id, name, age, class_name, phone_number FROM students";

/// Unicode lowercase. SQLite's built-in lower() only folds ASCII.
const FOLD_CASE: &str = "fold_case";

/// Student store backed by a SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating parent directories
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::with_connection(Connection::open(path)?)
    }

    /// A private database that disappears with the store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.create_scalar_function(
            FOLD_CASE,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        class_name: row.get(3)?,
        phone_number: row.get(4)?,
    })
}

impl StudentStore for SqliteStore {
    fn insert(&self, candidate: NewStudent) -> StoreResult<Student> {
        let conn = self.conn.lock()?;
        conn.execute(
            "INSERT INTO students (name, age, class_name, phone_number) VALUES (?1, ?2, ?3, ?4)",
            params![
                candidate.name,
                candidate.age,
                candidate.class_name,
                candidate.phone_number
            ],
        )?;
        Ok(Student::from_new(conn.last_insert_rowid(), candidate))
    }

    fn save(&self, student: &Student) -> StoreResult<Student> {
        let conn = self.conn.lock()?;
        let changed = conn.execute(
            "UPDATE students SET name = ?2, age = ?3, class_name = ?4, phone_number = ?5 WHERE id = ?1",
            params![
                student.id,
                student.name,
                student.age,
                student.class_name,
                student.phone_number
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::Missing(student.id));
        }
        Ok(student.clone())
    }

    fn find_all(&self) -> StoreResult<Vec<Student>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = stmt.query_map([], student_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Student>> {
        let conn = self.conn.lock()?;
        let student = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                student_from_row,
            )
            .optional()?;
        Ok(student)
    }

    fn find_by_name_containing_ignore_case(&self, fragment: &str) -> StoreResult<Vec<Student>> {
        // instr() instead of LIKE so '%' and '_' in the fragment stay literal.
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE instr({FOLD_CASE}(name), {FOLD_CASE}(?1)) > 0 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![fragment], student_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn exists_by_id(&self, id: i64) -> StoreResult<bool> {
        let conn = self.conn.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        let conn = self.conn.lock()?;
        conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;
        Ok(())
    }
}
