//! Private key/value settings area backed by a single JSON document

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON object file mapping keys to values.
///
/// Every write replaces the whole file through a temporary file and a
/// rename, so readers never observe a partially written document.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value stored under `key`, if any
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.write_all(&entries)?;
        Ok(true)
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No preferences file yet");
                return Ok(Map::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read preferences: {}", self.path.display())
                });
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => {
                warn!(path = %self.path.display(), "Preferences file is not an object, ignoring it");
                Ok(Map::new())
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Unreadable preferences file, ignoring it: {}", e);
                Ok(Map::new())
            }
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write preferences: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace preferences: {}", self.path.display()))?;

        Ok(())
    }
}
