use crate::error::AppError;
use crate::model::AppSettings;
use log::debug;
use std::fs;
use std::path::Path;

/// Loads settings from `path`; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<AppSettings, AppError> {
    if !path.exists() {
        debug!("{} not found, using default settings", path.display());
        return Ok(AppSettings::default());
    }

    let content = fs::read_to_string(path).map_err(|e| AppError::Settings(e.to_string()))?;
    let settings: AppSettings =
        serde_json::from_str(&content).map_err(|e| AppError::Settings(e.to_string()))?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &AppSettings) -> Result<(), AppError> {
    if settings.backup_dir.trim().is_empty() {
        return Err(AppError::Settings(
            "backupDir must not be empty".to_string(),
        ));
    }
    if settings.extensions.is_empty() {
        return Err(AppError::Settings(
            "extensions must list at least one extension".to_string(),
        ));
    }
    for ext in &settings.extensions {
        let ext = ext.trim();
        if ext.is_empty() || ext.starts_with('.') {
            return Err(AppError::Settings(format!(
                "invalid extension `{}`: give it without the leading dot",
                ext
            )));
        }
    }
    Ok(())
}
