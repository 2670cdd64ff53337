// ============================================================================
// POS Infrastructure - JSON File Preference Store
// File: crates/pos-infrastructure/src/storage/json_file.rs
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use pos_core::error::DomainError;
use pos_core::repositories::PreferenceStore;

/// Preferences kept in a single JSON object on disk, rewritten on every `set`.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// A missing file starts empty. A corrupt file is ignored and replaced
    /// on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable preference file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(DomainError::StorageError(format!("{}: {}", path.display(), e))),
        };
        debug!("Opened preference file {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), DomainError> {
        let raw = serde_json::to_string_pretty(values).map_err(|e| DomainError::StorageError(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DomainError::StorageError(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| DomainError::StorageError(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| DomainError::StorageError(e.to_string()))
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut values = self.values.lock();
        let previous = values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&values) {
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("pos-prefs-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let store = JsonFilePreferenceStore::open(temp_path()).unwrap();
        assert!(store.get("sidebar-collapsed").unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path();
        {
            let store = JsonFilePreferenceStore::open(&path).unwrap();
            store.set("sidebar-collapsed", "true").unwrap();
            store.set("sidebar-expanded-menus", r#"["/menu"]"#).unwrap();
        }
        let store = JsonFilePreferenceStore::open(&path).unwrap();
        assert_eq!(store.get("sidebar-collapsed").unwrap().as_deref(), Some("true"));
        assert_eq!(store.get("sidebar-expanded-menus").unwrap().as_deref(), Some(r#"["/menu"]"#));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let path = temp_path();
        fs::write(&path, "{{{").unwrap();
        let store = JsonFilePreferenceStore::open(&path).unwrap();
        assert!(store.get("anything").unwrap().is_none());
        store.set("k", "v").unwrap();
        let reopened = JsonFilePreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = std::env::temp_dir().join(format!("pos-prefs-dir-{}", Uuid::new_v4()));
        let path = dir.join("prefs.json");
        let store = JsonFilePreferenceStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
        let _ = fs::remove_dir_all(dir);
    }
}
