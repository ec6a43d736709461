//! Storage layer for schoolbook.
//!
//! Records are kept the way a browser keeps them in local storage: the whole
//! list is one JSON document stored under a single key. [`KeyValueArea`] is
//! the `SQLite`-backed key/value area, and [`RecordStore`] is the seam the
//! flows depend on, with a file-backed and an in-memory implementation.

pub mod migrations;
pub mod schema;

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::school::SchoolRecord;

/// Default key the school list is stored under.
pub const DEFAULT_KEY: &str = "schools";

/// Persistence for the ordered list of school records.
///
/// Reads and writes always move the whole list. There is no partial update
/// and the last writer wins.
pub trait RecordStore {
    /// Load every stored record in insertion order.
    ///
    /// Absent or unparsable data yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the underlying area cannot be read.
    fn try_load(&self) -> Result<Vec<SchoolRecord>>;

    /// Like [`Self::try_load`], but a read failure also yields an empty list.
    fn load(&self) -> Vec<SchoolRecord> {
        self.try_load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read records, treating as empty");
            Vec::new()
        })
    }

    /// Overwrite the stored list with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be encoded or written.
    fn save(&self, records: &[SchoolRecord]) -> Result<()>;
}

/// Decode a stored document, treating anything unparsable as empty.
fn decode_records(key: &str, raw: Option<&str>) -> Vec<SchoolRecord> {
    let Some(raw) = raw else {
        debug!(key, "No stored records");
        return Vec::new();
    };
    match serde_json::from_str::<Vec<SchoolRecord>>(raw) {
        Ok(records) => {
            debug!(key, count = records.len(), "Loaded records");
            records
        }
        Err(e) => {
            warn!(key, error = %e, "Stored records are unreadable, treating as empty");
            Vec::new()
        }
    }
}

/// A `SQLite`-backed key/value area holding one text document per key.
#[derive(Debug)]
pub struct KeyValueArea {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl KeyValueArea {
    /// Open or create a key/value area at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening key/value area at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        info!("Key/value area opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory area for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "Stored document");
        Ok(())
    }

    /// Delete the document stored under `key`.
    ///
    /// Returns `true` if a document was removed, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        if affected > 0 {
            info!(key, "Removed document");
        }
        Ok(affected > 0)
    }

    /// List all keys in the area, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

/// Record store backed by a [`KeyValueArea`] under a fixed key.
#[derive(Debug)]
pub struct SqliteRecordStore {
    area: KeyValueArea,
    key: String,
}

impl SqliteRecordStore {
    /// Wrap an area, storing records under `key`.
    #[must_use]
    pub fn new(area: KeyValueArea, key: impl Into<String>) -> Self {
        Self {
            area,
            key: key.into(),
        }
    }

    /// Open the area at `path` and store records under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the area cannot be opened.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(KeyValueArea::open(path)?, key))
    }

    /// The key records are stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying area.
    #[must_use]
    pub fn area(&self) -> &KeyValueArea {
        &self.area
    }

    /// Drop the stored list entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<bool> {
        self.area.remove(&self.key)
    }
}

impl RecordStore for SqliteRecordStore {
    fn try_load(&self) -> Result<Vec<SchoolRecord>> {
        let raw = self
            .area
            .get(&self.key)
            .map_err(|e| Error::persistence(&self.key, e.to_string()))?;
        Ok(decode_records(&self.key, raw.as_deref()))
    }

    fn save(&self, records: &[SchoolRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.area
            .set(&self.key, &json)
            .map_err(|e| Error::persistence(&self.key, e.to_string()))
    }
}

/// In-memory record store.
///
/// Holds the encoded document rather than the records so that the same
/// encode/decode path as the file-backed store is exercised.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    raw: RefCell<Option<String>>,
    fail_loads: Cell<bool>,
    fail_saves: Cell<bool>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given raw document.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// The raw stored document, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }
}

impl RecordStore for MemoryRecordStore {
    fn try_load(&self) -> Result<Vec<SchoolRecord>> {
        if self.fail_loads.get() {
            return Err(Error::persistence(DEFAULT_KEY, "storage unavailable"));
        }
        Ok(decode_records(DEFAULT_KEY, self.raw.borrow().as_deref()))
    }

    fn save(&self, records: &[SchoolRecord]) -> Result<()> {
        if self.fail_saves.get() {
            return Err(Error::persistence(DEFAULT_KEY, "storage quota exceeded"));
        }
        let json = serde_json::to_string(records)?;
        *self.raw.borrow_mut() = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(id: i64, name: &str) -> SchoolRecord {
        SchoolRecord {
            id,
            name: name.to_string(),
            address: "42 Long Road".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            contact: "9000000000".to_string(),
            email_id: "desk@school.in".to_string(),
            image: "/traditional-schoolhouse.png".to_string(),
        }
    }

    fn create_test_store() -> SqliteRecordStore {
        SqliteRecordStore::new(
            KeyValueArea::open_in_memory().expect("failed to create test area"),
            DEFAULT_KEY,
        )
    }

    #[test]
    fn test_area_get_missing() {
        let area = KeyValueArea::open_in_memory().unwrap();
        assert_eq!(area.get("schools").unwrap(), None);
    }

    #[test]
    fn test_area_set_get_overwrite() {
        let area = KeyValueArea::open_in_memory().unwrap();
        area.set("schools", "[1]").unwrap();
        area.set("schools", "[2]").unwrap();
        assert_eq!(area.get("schools").unwrap().as_deref(), Some("[2]"));
        assert_eq!(area.keys().unwrap(), vec!["schools".to_string()]);
    }

    #[test]
    fn test_area_remove() {
        let area = KeyValueArea::open_in_memory().unwrap();
        area.set("a", "1").unwrap();
        assert!(area.remove("a").unwrap());
        assert!(!area.remove("a").unwrap());
        assert!(area.keys().unwrap().is_empty());
    }

    #[test]
    fn test_area_keys_sorted() {
        let area = KeyValueArea::open_in_memory().unwrap();
        area.set("zeta", "1").unwrap();
        area.set("alpha", "2").unwrap();
        assert_eq!(
            area.keys().unwrap(),
            vec!["alpha".to_string(), "zeta".to_string()]
        );
    }

    #[test]
    fn test_area_path_in_memory() {
        let area = KeyValueArea::open_in_memory().unwrap();
        assert_eq!(area.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_load_empty_store() {
        assert!(create_test_store().load().is_empty());
        assert!(MemoryRecordStore::new().load().is_empty());
    }

    #[test]
    fn test_save_then_load_returns_same_records() {
        let records = vec![school(3, "Gamma"), school(1, "Alpha"), school(2, "Beta")];

        let store = create_test_store();
        store.save(&records).unwrap();
        assert_eq!(store.load(), records);

        let memory = MemoryRecordStore::new();
        memory.save(&records).unwrap();
        assert_eq!(memory.load(), records);
    }

    #[test]
    fn test_save_of_load_is_idempotent() {
        let store = create_test_store();
        store.save(&[school(1, "Alpha"), school(2, "Beta")]).unwrap();
        let before = store.area().get(DEFAULT_KEY).unwrap();

        store.save(&store.load()).unwrap();
        assert_eq!(store.area().get(DEFAULT_KEY).unwrap(), before);
    }

    #[test]
    fn test_unparsable_data_loads_as_empty() {
        let store = create_test_store();
        store.area().set(DEFAULT_KEY, "{not json").unwrap();
        assert!(store.load().is_empty());

        store.area().set(DEFAULT_KEY, r#"{"id": 1}"#).unwrap();
        assert!(store.load().is_empty());

        let memory = MemoryRecordStore::with_raw("garbage");
        assert!(memory.load().is_empty());
    }

    #[test]
    fn test_persisted_format_is_json_array() {
        let memory = MemoryRecordStore::new();
        memory.save(&[school(5, "Delta")]).unwrap();
        let raw = memory.raw().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["email_id"], "desk@school.in");
    }

    #[test]
    fn test_memory_store_failing_save() {
        let memory = MemoryRecordStore::new();
        memory.save(&[school(1, "Alpha")]).unwrap();
        memory.set_fail_saves(true);

        let err = memory.save(&[]).unwrap_err();
        assert!(err.is_persistence_error());
        assert_eq!(memory.load().len(), 1);
    }

    #[test]
    fn test_memory_store_failing_load() {
        let memory = MemoryRecordStore::new();
        memory.save(&[school(1, "Alpha")]).unwrap();
        memory.set_fail_loads(true);

        let err = memory.try_load().unwrap_err();
        assert!(err.is_persistence_error());
        assert!(memory.load().is_empty());

        memory.set_fail_loads(false);
        assert_eq!(memory.try_load().unwrap().len(), 1);
    }

    #[test]
    fn test_unreadable_column_is_a_read_error() {
        let store = create_test_store();
        store
            .area()
            .conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)",
                params![DEFAULT_KEY, vec![0xde_u8, 0xad, 0xbe, 0xef]],
            )
            .unwrap();

        let err = store.try_load().unwrap_err();
        assert!(matches!(err, Error::Persistence { ref key, .. } if key == DEFAULT_KEY));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_try_load_absent_and_unparsable_are_empty() {
        let store = create_test_store();
        assert!(store.try_load().unwrap().is_empty());

        store.area().set(DEFAULT_KEY, "{not json").unwrap();
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_key() {
        let store = create_test_store();
        store.save(&[school(1, "Alpha")]).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_custom_key_is_isolated() {
        let area = KeyValueArea::open_in_memory().unwrap();
        area.set(DEFAULT_KEY, "[]").unwrap();
        let store = SqliteRecordStore::new(area, "other");
        store.save(&[school(1, "Alpha")]).unwrap();

        assert_eq!(store.key(), "other");
        assert_eq!(store.area().get(DEFAULT_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("schoolbook.db");

        {
            let store = SqliteRecordStore::open(&path, DEFAULT_KEY).unwrap();
            store.save(&[school(1, "Alpha")]).unwrap();
            assert_eq!(store.area().path(), path);
        }

        let reopened = SqliteRecordStore::open(&path, DEFAULT_KEY).unwrap();
        assert_eq!(reopened.load(), vec![school(1, "Alpha")]);
    }

    #[test]
    fn test_unicode_round_trip() {
        let store = create_test_store();
        let mut record = school(1, "विद्यालय 学校");
        record.city = "São Paulo".to_string();
        store.save(&[record.clone()]).unwrap();
        assert_eq!(store.load(), vec![record]);
    }
}
