//! Settings command module

use std::path::Path;

use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;

/// Load settings from `path` or the platform default
pub async fn get_settings(path: Option<&Path>) -> AppResult<AppSettings> {
    AppSettings::try_load(path).await
}

pub async fn save_settings(settings: &AppSettings, path: Option<&Path>) -> AppResult<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => AppSettings::get_settings_path()?,
    };
    settings.save_to(&path).await
}
