//! Key/value persistence
//!
//! Backends:
//! - LocalStorage (wasm32)
//! - One JSON file per key in a data directory (native)
//! - In-memory map (tests, or hosts without storage)
//!
//! Values are JSON strings. Failures surface as `PersistenceError`; callers
//! log them and fall back to defaults.

use std::cell::RefCell;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Environment variable overriding the native data directory
#[cfg(not(target_arch = "wasm32"))]
pub const DATA_DIR_ENV: &str = "BOW_DEFENSE_DATA";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected write to `{key}`")]
    WriteRejected { key: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

enum Backend {
    Memory(RefCell<HashMap<String, String>>),
    #[cfg(not(target_arch = "wasm32"))]
    Files(PathBuf),
    #[cfg(target_arch = "wasm32")]
    Local(web_sys::Storage),
}

/// A string key/value store
pub struct Storage {
    backend: Backend,
}

impl Storage {
    /// Volatile store, lost when dropped
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(RefCell::new(HashMap::new())),
        }
    }

    /// Store each key as `<dir>/<key>.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Files(dir.into()),
        }
    }

    /// Platform default: `$BOW_DEFENSE_DATA` or `./.bow-defense`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn platform() -> Result<Self> {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".bow-defense"));
        Ok(Self::in_dir(dir))
    }

    /// Platform default: the window's LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn platform() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)?;
        Ok(Self {
            backend: Backend::Local(storage),
        })
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        match &self.backend {
            Backend::Memory(map) => Ok(map.borrow().get(key).cloned()),
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Files(dir) => match std::fs::read_to_string(dir.join(format!("{key}.json"))) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            #[cfg(target_arch = "wasm32")]
            Backend::Local(storage) => storage
                .get_item(key)
                .map_err(|_| PersistenceError::Unavailable),
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.borrow_mut().insert(key.to_string(), value.to_string());
                Ok(())
            }
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Files(dir) => {
                std::fs::create_dir_all(dir)?;
                // Write a temp file and rename it over the old one
                let tmp = dir.join(format!("{key}.json.tmp"));
                std::fs::write(&tmp, value)?;
                std::fs::rename(&tmp, dir.join(format!("{key}.json")))?;
                Ok(())
            }
            #[cfg(target_arch = "wasm32")]
            Backend::Local(storage) => {
                storage
                    .set_item(key, value)
                    .map_err(|_| PersistenceError::WriteRejected {
                        key: key.to_string(),
                    })
            }
        }
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.borrow_mut().remove(key);
                Ok(())
            }
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Files(dir) => match std::fs::remove_file(dir.join(format!("{key}.json"))) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            },
            #[cfg(target_arch = "wasm32")]
            Backend::Local(storage) => storage
                .remove_item(key)
                .map_err(|_| PersistenceError::WriteRejected {
                    key: key.to_string(),
                }),
        }
    }

    /// Read and decode a JSON value
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set_item(key, &json)
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: u32,
    }

    #[test]
    fn test_memory_round_trip() {
        let storage = Storage::memory();
        assert_eq!(storage.get_item("missing").unwrap(), None);

        let sample = Sample {
            name: "bow".into(),
            value: 7,
        };
        storage.save_json("sample", &sample).unwrap();
        let loaded: Option<Sample> = storage.load_json("sample").unwrap();
        assert_eq!(loaded, Some(sample));

        storage.remove_item("sample").unwrap();
        assert_eq!(storage.get_item("sample").unwrap(), None);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let storage = Storage::memory();
        storage.set_item("bad", "{not json").unwrap();
        let result: Result<Option<Sample>> = storage.load_json("bad");
        assert!(matches!(result, Err(PersistenceError::Json(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_backend() {
        let dir = std::env::temp_dir().join(format!("bow-defense-test-{}", std::process::id()));
        let storage = Storage::in_dir(&dir);
        assert_eq!(storage.get_item("name").unwrap(), None);
        storage.set_item("name", "\"robin\"").unwrap();
        assert_eq!(storage.get_item("name").unwrap().as_deref(), Some("\"robin\""));
        storage.remove_item("name").unwrap();
        storage.remove_item("name").unwrap();
        assert_eq!(storage.get_item("name").unwrap(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
