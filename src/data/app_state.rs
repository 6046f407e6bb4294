//! App state data access object (key-value store)

use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

use super::database::DatabaseError;
use crate::presets::{BackendError, PresetBackend};

/// Data access object for app state (key-value store)
#[derive(Clone)]
pub struct AppStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl AppStateStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }

    /// Set a value (insert or update)
    pub fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO app_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM app_state WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;

        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }
}

impl From<DatabaseError> for BackendError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::LockPoisoned => BackendError::Unavailable(err.to_string()),
            other => BackendError::Storage(other.to_string()),
        }
    }
}

impl PresetBackend for AppStateStore {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.get(key)?)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), BackendError> {
        Ok(self.set(key, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Database;
    use tempfile::tempdir;

    fn setup_db() -> (tempfile::TempDir, Database, AppStateStore) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        let dao = AppStateStore::new(db.connection());
        (dir, db, dao)
    }

    #[test]
    fn test_set_and_get() {
        let (_dir, _db, dao) = setup_db();

        dao.set("theme", "dark").unwrap();
        assert_eq!(dao.get("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_update() {
        let (_dir, _db, dao) = setup_db();

        dao.set("theme", "dark").unwrap();
        dao.set("theme", "light").unwrap();

        assert_eq!(dao.get("theme").unwrap(), Some("light".to_string()));
    }

    #[test]
    fn test_get_nonexistent() {
        let (_dir, _db, dao) = setup_db();
        assert_eq!(dao.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_backend_trait_round_trips_documents() {
        let (_dir, _db, dao) = setup_db();
        let backend: &dyn PresetBackend = &dao;

        assert_eq!(backend.read("presets").unwrap(), None);
        backend.write("presets", r#"{"Phones":{"w":"360px"}}"#).unwrap();
        assert_eq!(
            backend.read("presets").unwrap().as_deref(),
            Some(r#"{"Phones":{"w":"360px"}}"#)
        );
    }
}
