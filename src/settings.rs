//! Persisted user settings: the selected ratio and the rounding precision.
//!
//! The file is read once when a session starts and written once when it ends.
//! Saving goes through a temporary file that is renamed over the target, so a
//! failed save never leaves a truncated settings file behind.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR_NAME: &str = "sum-parameters";
pub const DEFAULT_FILE_NAME: &str = "settings.json";

/// Missing fields take their default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub selected_ratio: f64,
    pub value_rounding: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_ratio: 1.0,
            value_rounding: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store for `file_name` inside the per-user configuration directory.
    /// The name is sanitized and given a `.json` extension if it lacks one.
    pub fn in_config_dir(file_name: &str) -> Result<Self, SettingsError> {
        Ok(Self::new(app_dir()?.join(safe_file_name(file_name))))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings record.
    ///
    /// A missing, empty or blank file is not an error and yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<Settings>, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file");
                return Ok(None);
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            debug!(path = %self.path.display(), "settings file is empty");
            return Ok(None);
        }

        let settings: Settings = serde_json::from_str(&content)
            .map_err(|source| SettingsError::json(self.path.clone(), source))?;
        info!(path = %self.path.display(), ?settings, "loaded settings");
        Ok(Some(settings))
    }

    /// Writes the settings record, creating the parent directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_err = |source: std::io::Error| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(settings)
            .map_err(|source| SettingsError::json(self.path.clone(), source))?;

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json).map_err(io_err)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(e));
        }

        info!(path = %self.path.display(), ?settings, "saved settings");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

/// `<config dir>/sum-parameters`, also used for the log file.
pub fn app_dir() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(SettingsError::NoConfigDir)
}

/// Strips characters that are not valid in file names on common platforms
/// and ensures a `.json` extension.
#[must_use]
pub fn safe_file_name(file_name: &str) -> String {
    let mut name: String = file_name
        .trim()
        .chars()
        .filter(|&c| {
            !c.is_control() && !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
        })
        .collect();

    if name.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }
    if !name.to_ascii_lowercase().ends_with(".json") {
        name.push_str(".json");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested/deeper/settings.json"));
        let settings = Settings {
            selected_ratio: 0.001,
            value_rounding: 4,
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), Some(settings));
        assert!(!dir.path().join("nested/deeper/settings.json.tmp").exists());
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        store.save(&Settings::default()).unwrap();
        let updated = Settings {
            selected_ratio: 100.0,
            value_rounding: 0,
        };
        store.save(&updated).unwrap();
        assert_eq!(store.load().unwrap(), Some(updated));
    }

    #[test]
    fn missing_or_blank_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), None);

        fs::write(store.path(), "  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn corrupt_file_reports_position() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        fs::write(store.path(), "{\n  \"selectedRatio\": oops\n}").unwrap();

        match store.load() {
            Err(SettingsError::Json { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn partial_record_fills_missing_fields_with_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        fs::write(store.path(), r#"{"selectedRatio": 10}"#).unwrap();
        assert_eq!(
            store.load().unwrap(),
            Some(Settings {
                selected_ratio: 10.0,
                value_rounding: 2,
            })
        );

        fs::write(store.path(), r#"{"valueRounding": 5}"#).unwrap();
        assert_eq!(
            store.load().unwrap(),
            Some(Settings {
                selected_ratio: 1.0,
                value_rounding: 5,
            })
        );

        fs::write(store.path(), "{}").unwrap();
        assert_eq!(store.load().unwrap(), Some(Settings::default()));
    }

    #[test]
    fn file_uses_camel_case_fields() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(json, r#"{"selectedRatio":1.0,"valueRounding":2}"#);
    }

    #[test]
    fn sanitizes_file_names() {
        assert_eq!(safe_file_name("my:settings"), "mysettings.json");
        assert_eq!(safe_file_name("a/b\\c.JSON"), "abc.JSON");
        assert_eq!(safe_file_name("  "), DEFAULT_FILE_NAME);
    }
}
