//! JSON file-backed settings store.
//!
//! Persists the key-value settings as a single flat JSON object. The file
//! is read once when the store is opened and rewritten in full on every
//! `set`, which keeps the on-disk format trivially inspectable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::error::SettingsError;
use super::SettingsStore;

/// File name of the settings document inside the config directory.
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Application directory under the platform config directory.
const APP_DIR_NAME: &str = "pomoflow";

/// Settings store persisted as a flat JSON object on disk.
pub struct JsonFileSettingsStore {
    /// Path of the JSON document.
    path: PathBuf,
    /// In-memory copy of the document; the file is the mirror.
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileSettingsStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// A missing file starts the store empty; an unreadable or corrupt file
    /// is logged and also starts the store empty, so stale data can never
    /// block the timer.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!("設定ファイル {:?} を解析できません: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("設定ファイル {:?} を読み込めません: {}", path, e);
                BTreeMap::new()
            }
        };

        debug!("Settings store opened at {:?} ({} keys)", path, values.len());

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Opens the store at the default platform location
    /// (`<config dir>/pomoflow/settings.json`), or `None` if no config
    /// directory can be determined.
    #[must_use]
    pub fn open_default() -> Option<Self> {
        let dir = dirs::config_dir()?.join(APP_DIR_NAME);
        Some(Self::open(dir.join(SETTINGS_FILE_NAME)))
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::WriteFailed(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| SettingsError::SerializeFailed(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| SettingsError::WriteFailed(e.to_string()))
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }
}

impl std::fmt::Debug for JsonFileSettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileSettingsStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
