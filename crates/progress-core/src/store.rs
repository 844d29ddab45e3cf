//! Persisted settings with fallback to defaults.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Key holding the note list.
pub const KEY_NOTES: &str = "notes";
/// Key holding the dark mode flag.
pub const KEY_DARK_MODE: &str = "dark_mode";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A key-value store of JSON values.
pub trait SettingsStore: Send {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: Value) -> StoreResult<()>;
}

/// SQLite-backed settings.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the store at path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Create in-memory store (for testing).
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl SettingsStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: Value) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, serde_json::to_string(&value)?],
        )?;
        Ok(())
    }
}

/// Settings kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> StoreResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Typed access to a [`SettingsStore`].
///
/// Reads never fail: a missing key, a broken store or a malformed value all
/// yield the default. Writes report errors so callers can decide how to
/// degrade.
pub struct Settings {
    store: Box<dyn SettingsStore>,
}

impl Settings {
    pub fn new(store: impl SettingsStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Settings that live only for this process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open SQLite settings at path, or fall back to memory.
    pub fn open_or_memory(path: &Path) -> Self {
        match SqliteStore::open(path) {
            Ok(store) => Self::new(store),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings unavailable, using memory");
                Self::in_memory()
            }
        }
    }

    /// Read a value, or `default` if it cannot be read.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.get(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!(key, error = %e, "malformed setting, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "failed to read setting, using default");
                default
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        let value = serde_json::to_value(value)?;
        self.store.set(key, value)
    }

    pub fn notes(&self) -> Vec<String> {
        self.get_or(KEY_NOTES, Vec::new())
    }

    pub fn save_notes(&mut self, notes: &[String]) -> StoreResult<()> {
        self.set(KEY_NOTES, &notes)
    }

    /// Dark mode, on unless turned off.
    pub fn dark_mode(&self) -> bool {
        self.get_or(KEY_DARK_MODE, true)
    }

    pub fn save_dark_mode(&mut self, dark: bool) -> StoreResult<()> {
        self.set(KEY_DARK_MODE, &dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A store whose backend is gone.
    struct BrokenStore;

    impl SettingsStore for BrokenStore {
        fn get(&self, _key: &str) -> StoreResult<Option<Value>> {
            Err(StoreError::Unavailable("disk detached".into()))
        }

        fn set(&mut self, _key: &str, _value: Value) -> StoreResult<()> {
            Err(StoreError::Unavailable("disk detached".into()))
        }
    }

    #[test]
    fn test_sqlite_round_trip() {
        let mut store = SqliteStore::in_memory().unwrap();
        assert!(store.get(KEY_DARK_MODE).unwrap().is_none());

        store.set(KEY_DARK_MODE, Value::Bool(false)).unwrap();
        store.set(KEY_DARK_MODE, Value::Bool(true)).unwrap();
        assert_eq!(store.get(KEY_DARK_MODE).unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn test_sqlite_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.db");

        {
            let mut settings = Settings::new(SqliteStore::open(&path).unwrap());
            settings
                .save_notes(&["ship it".to_string(), "rest".to_string()])
                .unwrap();
            settings.save_dark_mode(false).unwrap();
        }

        let settings = Settings::open_or_memory(&path);
        assert_eq!(settings.notes(), vec!["ship it", "rest"]);
        assert!(!settings.dark_mode());
    }

    #[test]
    fn test_defaults_when_empty() {
        let settings = Settings::in_memory();
        assert!(settings.notes().is_empty());
        assert!(settings.dark_mode());
    }

    #[test]
    fn test_broken_store_falls_back() {
        let mut settings = Settings::new(BrokenStore);
        assert!(settings.dark_mode());
        assert!(settings.notes().is_empty());
        assert!(matches!(
            settings.save_dark_mode(false),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn test_malformed_value_falls_back() {
        let mut store = MemoryStore::new();
        store.set(KEY_NOTES, Value::String("not a list".into())).unwrap();
        let settings = Settings::new(store);
        assert!(settings.notes().is_empty());
    }

    #[test]
    fn test_unopenable_path_uses_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        // A regular file cannot be a parent directory.
        let mut settings = Settings::open_or_memory(&blocker.join("settings.db"));
        settings.save_dark_mode(false).unwrap();
        assert!(!settings.dark_mode());
    }
}
