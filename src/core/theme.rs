//! Theme flag and its key-value store
//!
//! The theme is a single string under [`THEME_KEY`], read once at startup
//! and written on every toggle.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::shared::error::{AppError, AppResult};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only the exact stored value `"dark"` means dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Persistent string key-value storage
#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> AppResult<HashMap<String, String>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path).await
            .map_err(|e| AppError::Storage(format!("Failed to read flag store: {}", e)))?;

        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| AppError::Storage(format!("Corrupt flag store {}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl FlagStore for JsonFileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut values = match self.read_all().await {
            Ok(values) => values,
            Err(AppError::Storage(msg)) => {
                tracing::warn!("[Theme] {}, overwriting", msg);
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, content).await
            .map_err(|e| AppError::Storage(format!("Failed to write flag store: {}", e)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let values = self.values.read()
            .map_err(|_| AppError::Storage("store poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut values = self.values.write()
            .map_err(|_| AppError::Storage("store poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Current theme plus the store it is persisted in.
#[derive(Debug)]
pub struct ThemeFlag<S> {
    store: S,
    theme: Theme,
}

impl<S: FlagStore> ThemeFlag<S> {
    /// Read the persisted value; absent, unrecognised or unreadable means light.
    pub async fn load(store: S) -> Self {
        let stored = store.get(THEME_KEY).await.unwrap_or_else(|e| {
            tracing::warn!("[Theme] Could not read stored theme: {}", e);
            None
        });
        let theme = Theme::from_stored(stored.as_deref());
        tracing::debug!(stored = ?stored, "Loaded theme {}", theme.as_str());
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Flip and persist immediately. The in-memory value only changes once
    /// the write succeeds.
    pub async fn toggle(&mut self) -> AppResult<Theme> {
        let next = self.theme.toggled();
        self.store.set(THEME_KEY, next.as_str()).await?;
        self.theme = next;
        tracing::info!("Theme switched to {}", next.as_str());
        Ok(next)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_to_light_when_unset() {
        let flag = ThemeFlag::load(MemoryStore::new()).await;
        assert_eq!(flag.theme(), Theme::Light);
        assert!(!flag.is_dark());
    }

    #[tokio::test]
    async fn test_unrecognised_value_is_light() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "solarized").await.unwrap();
        let flag = ThemeFlag::load(store).await;
        assert_eq!(flag.theme(), Theme::Light);
    }

    #[tokio::test]
    async fn test_toggle_persists_each_change() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "dark").await.unwrap();
        let mut flag = ThemeFlag::load(store).await;
        assert!(flag.is_dark());

        assert_eq!(flag.toggle().await.unwrap(), Theme::Light);
        assert_eq!(flag.store().get(THEME_KEY).await.unwrap().as_deref(), Some("light"));

        assert_eq!(flag.toggle().await.unwrap(), Theme::Dark);
        assert_eq!(flag.store().get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");

        let mut flag = ThemeFlag::load(JsonFileStore::new(&path)).await;
        assert_eq!(flag.theme(), Theme::Light);
        flag.toggle().await.unwrap();

        let reloaded = ThemeFlag::load(JsonFileStore::new(&path)).await;
        assert_eq!(reloaded.theme(), Theme::Dark);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"theme\": \"dark\""));
    }

    #[tokio::test]
    async fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("flags.json"));
        store.set("other", "value").await.unwrap();
        store.set(THEME_KEY, "dark").await.unwrap();

        assert_eq!(store.get("other").await.unwrap().as_deref(), Some("value"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_light_and_is_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        std::fs::write(&path, "{truncated").unwrap();

        let mut flag = ThemeFlag::load(JsonFileStore::new(&path)).await;
        assert_eq!(flag.theme(), Theme::Light);

        assert_eq!(flag.toggle().await.unwrap(), Theme::Dark);
        let reloaded = ThemeFlag::load(JsonFileStore::new(&path)).await;
        assert_eq!(reloaded.theme(), Theme::Dark);
    }
}
