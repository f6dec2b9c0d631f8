//! JSON persistence helpers
//!
//! Every failure is logged at warn and reported as `None`/`false`; callers
//! fall back to defaults.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
pub use native::*;

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::*;

    /// Directory name under the user's local data dir
    const APP_DIR: &str = "sheep-chase";

    /// Location of a data file, if the platform has a data directory
    pub fn data_path(file_name: &str) -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join(file_name))
    }

    /// Read and parse a JSON file. A missing file is not an error.
    pub fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
        if !path.exists() {
            log::info!("No file at {:?}, using defaults", path);
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(value) => {
                    log::info!("Loaded {:?}", path);
                    Some(value)
                }
                Err(e) => {
                    log::warn!("Failed to parse {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    /// Write a value as pretty JSON, creating parent directories as needed
    pub fn save_json<T: Serialize>(path: &Path, value: &T) -> bool {
        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            log::warn!("Failed to create directory {:?}: {}", parent, e);
            return false;
        }

        match serde_json::to_string_pretty(value) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => {
                    log::info!("Saved {:?}", path);
                    true
                }
                Err(e) => {
                    log::warn!("Failed to write {:?}: {}", path, e);
                    false
                }
            },
            Err(e) => {
                log::warn!("Failed to serialize {:?}: {}", path, e);
                false
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::Storage;

    use super::*;

    fn local_storage() -> Option<Storage> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable");
        }
        storage
    }

    /// Read and parse a LocalStorage entry. A missing key is not an error.
    pub fn load_local<T: DeserializeOwned>(key: &str) -> Option<T> {
        let storage = local_storage()?;
        let Ok(Some(json)) = storage.get_item(key) else {
            log::info!("No LocalStorage entry for {}, using defaults", key);
            return None;
        };
        match serde_json::from_str(&json) {
            Ok(value) => {
                log::info!("Loaded {} from LocalStorage", key);
                Some(value)
            }
            Err(e) => {
                log::warn!("Failed to parse LocalStorage entry {}: {}", key, e);
                None
            }
        }
    }

    /// Store a value as JSON under `key`
    pub fn save_local<T: Serialize>(key: &str, value: &T) -> bool {
        let Some(storage) = local_storage() else {
            return false;
        };
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize {}: {}", key, e);
                return false;
            }
        };
        if storage.set_item(key, &json).is_err() {
            log::warn!("Failed to write LocalStorage entry {}", key);
            return false;
        }
        log::info!("Saved {} to LocalStorage", key);
        true
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn temp_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("sheep-chase-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_file("storage.json");
        let mut value = BTreeMap::new();
        value.insert("best".to_string(), 42u64);
        assert!(save_json(&path, &value));
        let loaded: Option<BTreeMap<String, u64>> = load_json(&path);
        assert_eq!(loaded, Some(value));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let missing = temp_file("does-not-exist.json");
        assert_eq!(load_json::<u64>(&missing), None);

        let corrupt = temp_file("corrupt.json");
        if let Some(parent) = corrupt.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&corrupt, "{not json").unwrap();
        assert_eq!(load_json::<u64>(&corrupt), None);
        let _ = std::fs::remove_file(&corrupt);
    }
}
