//! Local key-value store backed by SQLite.
//!
//! The browser-local storage analog: opaque string or JSON blobs under
//! well-known keys, no schema versioning, no migration. Concurrent
//! processes may race on writes; last write wins.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const KEY_TOKEN: &str = "enterprise_ai_token";
pub const KEY_USER: &str = "enterprise_ai_user";
pub const KEY_PROFILE: &str = "developerProfile";
pub const KEY_AI_API_KEY: &str = "aiApiKey";
pub const KEY_USER_ROLE: &str = "userRole";
pub const KEY_THEME: &str = "theme";

pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Deserialize a JSON blob under `key`. An unreadable blob reads as
    /// absent, matching how the pages treat corrupt local state.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self
            .get(key)?
            .and_then(|raw| serde_json::from_str(&raw).ok()))
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.set(key, &serde_json::to_string(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_roundtrip() {
        let mut store = LocalStore::open_in_memory().unwrap();
        assert!(store.get(KEY_THEME).unwrap().is_none());
        store.set(KEY_THEME, "dark").unwrap();
        assert_eq!(store.get(KEY_THEME).unwrap().as_deref(), Some("dark"));
        store.set(KEY_THEME, "light").unwrap();
        assert_eq!(store.get(KEY_THEME).unwrap().as_deref(), Some("light"));
        store.remove(KEY_THEME).unwrap();
        assert!(store.get(KEY_THEME).unwrap().is_none());
    }

    #[test]
    fn corrupt_json_reads_as_absent() {
        let mut store = LocalStore::open_in_memory().unwrap();
        store.set(KEY_USER, "{not json").unwrap();
        let user: Option<serde_json::Value> = store.get_json(KEY_USER).unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hub.db");
        let path = path.to_str().unwrap();
        {
            let mut store = LocalStore::open(path).unwrap();
            store.set(KEY_USER_ROLE, "manager").unwrap();
        }
        let store = LocalStore::open(path).unwrap();
        assert_eq!(
            store.get(KEY_USER_ROLE).unwrap().as_deref(),
            Some("manager")
        );
    }
}
