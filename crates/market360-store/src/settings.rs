use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use crate::error::StoreError;

pub const KEY_API_KEY: &str = "openrouter_api_key";
pub const KEY_BASE_URL: &str = "openrouter_base_url";
pub const KEY_MODEL: &str = "openrouter_model";

const SETTINGS_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS settings (\
    key TEXT PRIMARY KEY NOT NULL, \
    value TEXT NOT NULL, \
    updated_at TEXT NOT NULL)";

/// Key/value store for user settings that outlive a single run.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// SQLite-backed settings store.
///
/// Access is synchronized via `Mutex` since `rusqlite::Connection` is not `Sync`.
pub struct SqliteSettingsStore {
    conn: Mutex<Connection>,
}

impl SqliteSettingsStore {
    /// Open (or create) the settings database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SETTINGS_TABLE_DDL)?;
        debug!(path, "Opened settings store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SETTINGS_TABLE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("SQLite mutex poisoned: {e}")))
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached("SELECT value FROM settings WHERE key = ?1")?;
        let result = stmt.query_row(rusqlite::params![key], |row| row.get(0));

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM settings WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }
}

/// The persisted OpenRouter connection settings. Absent keys stay `None`.
#[derive(Clone, PartialEq, Default)]
pub struct OpenRouterSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl std::fmt::Debug for OpenRouterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenRouterSettings {
    pub fn load(store: &dyn SettingsStore) -> Result<Self, StoreError> {
        Ok(Self {
            api_key: non_empty(store.get(KEY_API_KEY)?),
            base_url: non_empty(store.get(KEY_BASE_URL)?),
            model: non_empty(store.get(KEY_MODEL)?),
        })
    }

    /// Write every field that is set. Unset fields leave the stored value alone.
    pub fn save(&self, store: &dyn SettingsStore) -> Result<(), StoreError> {
        let fields = [
            (KEY_API_KEY, &self.api_key),
            (KEY_BASE_URL, &self.base_url),
            (KEY_MODEL, &self.model),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                store.set(key, value)?;
            }
        }
        Ok(())
    }

    pub fn clear(store: &dyn SettingsStore) -> Result<(), StoreError> {
        for key in [KEY_API_KEY, KEY_BASE_URL, KEY_MODEL] {
            store.remove(key)?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key() {
        let store = SqliteSettingsStore::open_in_memory().unwrap();
        assert!(store.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_then_get_overwrites() {
        let store = SqliteSettingsStore::open_in_memory().unwrap();
        store.set(KEY_MODEL, "openai/gpt-4o").unwrap();
        store.set(KEY_MODEL, "anthropic/claude-3.5-sonnet").unwrap();
        assert_eq!(
            store.get(KEY_MODEL).unwrap().as_deref(),
            Some("anthropic/claude-3.5-sonnet")
        );
    }

    #[test]
    fn remove_key() {
        let store = SqliteSettingsStore::open_in_memory().unwrap();
        store.set(KEY_API_KEY, "sk-or-1").unwrap();
        store.remove(KEY_API_KEY).unwrap();
        assert!(store.get(KEY_API_KEY).unwrap().is_none());
    }

    #[test]
    fn settings_roundtrip_through_store() {
        let store = SqliteSettingsStore::open_in_memory().unwrap();
        let settings = OpenRouterSettings {
            api_key: Some("sk-or-abc".to_string()),
            base_url: None,
            model: Some("openai/gpt-4o".to_string()),
        };
        settings.save(&store).unwrap();

        let loaded = OpenRouterSettings::load(&store).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn blank_values_load_as_none() {
        let store = SqliteSettingsStore::open_in_memory().unwrap();
        store.set(KEY_BASE_URL, "   ").unwrap();
        let loaded = OpenRouterSettings::load(&store).unwrap();
        assert!(loaded.base_url.is_none());
    }

    #[test]
    fn clear_removes_everything() {
        let store = SqliteSettingsStore::open_in_memory().unwrap();
        OpenRouterSettings {
            api_key: Some("k".to_string()),
            base_url: Some("http://localhost".to_string()),
            model: Some("m".to_string()),
        }
        .save(&store)
        .unwrap();

        OpenRouterSettings::clear(&store).unwrap();
        assert_eq!(OpenRouterSettings::load(&store).unwrap(), OpenRouterSettings::default());
    }

    #[test]
    fn debug_hides_api_key() {
        let settings = OpenRouterSettings {
            api_key: Some("sk-or-secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{settings:?}").contains("sk-or-secret"));
    }
}
