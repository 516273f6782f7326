use crate::domain::Priority;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ESTIMATE_MINUTES: u32 = 25;

/// User settings stored in meta.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub notifications_enabled: bool,
    pub default_estimate_minutes: u32,
    pub default_priority: Priority,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            default_estimate_minutes: DEFAULT_ESTIMATE_MINUTES,
            default_priority: Priority::Medium,
        }
    }
}

/// Load settings from meta.json, defaults if the file doesn't exist
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let mut settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))?;

    // A zero estimate would make every quick-add invalid
    if settings.default_estimate_minutes == 0 {
        settings.default_estimate_minutes = DEFAULT_ESTIMATE_MINUTES;
    }
    Ok(settings)
}

/// Save settings to meta.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");

        let settings = load_settings(&meta_path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");

        let settings = Settings {
            notifications_enabled: false,
            default_estimate_minutes: 50,
            default_priority: Priority::High,
        };
        save_settings(&meta_path, &settings).unwrap();

        assert_eq!(load_settings(&meta_path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");
        std::fs::write(&meta_path, r#"{"notifications_enabled": false}"#).unwrap();

        let settings = load_settings(&meta_path).unwrap();
        assert!(!settings.notifications_enabled);
        assert_eq!(settings.default_estimate_minutes, 25);
        assert_eq!(settings.default_priority, Priority::Medium);
    }

    #[test]
    fn test_zero_estimate_replaced() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");
        std::fs::write(&meta_path, r#"{"default_estimate_minutes": 0}"#).unwrap();

        assert_eq!(load_settings(&meta_path).unwrap().default_estimate_minutes, 25);
    }
}
