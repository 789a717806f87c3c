use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;

use crate::shared::error::{AppError, AppResult};

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub rates: RatesSettings,
    pub preferences: UserPreferences,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesSettings {
    /// Base code is appended as the last path segment.
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// Base used to populate the currency code list
    pub list_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub default_currency_from: String,
    pub default_currency_to: String,
    pub default_amount: f64,
    pub default_category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub flag_store_path: Option<PathBuf>,
}

impl Default for RatesSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_RATES_URL.to_string(),
            timeout_secs: 10,
            list_base: "USD".to_string(),
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_currency_from: "USD".to_string(),
            default_currency_to: "EUR".to_string(),
            default_amount: 1.0,
            default_category: "length".to_string(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            rates: RatesSettings::default(),
            preferences: UserPreferences::default(),
            storage: StorageSettings::default(),
        }
    }
}

pub(crate) fn project_dirs() -> AppResult<ProjectDirs> {
    ProjectDirs::from("com", "antigravity", "converter-board")
        .ok_or_else(|| AppError::Io("Failed to determine config directory".to_string()))
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("settings.json"))
    }

    /// Like [`try_load`](Self::try_load), but an unreadable or malformed
    /// file degrades to the defaults.
    pub async fn load(path: Option<&Path>) -> Self {
        match Self::try_load(path).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("[Settings] {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load from `path` (or the platform default), writing defaults on first run.
    pub async fn try_load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::get_settings_path()?,
        };

        if !fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "No settings file, writing defaults");
            let settings = Self::default();
            settings.save_to(&path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(&path).await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).await
            .map_err(|e| AppError::Io(format!("Failed to write settings file: {}", e)))
    }

    /// Where the theme flag lives unless overridden.
    pub fn flag_store_path(&self) -> AppResult<PathBuf> {
        match &self.storage.flag_store_path {
            Some(p) => Ok(p.clone()),
            None => Ok(project_dirs()?.config_dir().join("flags.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_writes_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = AppSettings::try_load(Some(&path)).await.unwrap();
        assert_eq!(settings.rates.api_base_url, DEFAULT_RATES_URL);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{"preferences":{"default_currency_to":"JPY"}}"#)
            .await
            .unwrap();

        let settings = AppSettings::load(Some(&path)).await;
        assert_eq!(settings.preferences.default_currency_to, "JPY");
        assert_eq!(settings.preferences.default_currency_from, "USD");
        assert_eq!(settings.rates.timeout_secs, 10);
    }

    #[tokio::test]
    async fn test_malformed_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = AppSettings::try_load(Some(&path)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let settings = AppSettings::load(Some(&path)).await;
        assert_eq!(settings.preferences.default_category, "length");
        // The user's file is left alone for them to fix
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[tokio::test]
    async fn test_unwritable_config_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        // Parent is a regular file, so the directory can't be created
        let path = blocker.join("settings.json");

        assert!(AppSettings::try_load(Some(&path)).await.is_err());
        let settings = AppSettings::load(Some(&path)).await;
        assert_eq!(settings.rates.timeout_secs, 10);
    }
}
