//! File-backed storage.
//!
//! Stores all values in a single JSON object file with restricted
//! permissions (0600). A missing file reads as an empty store.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::{DurableStore, StorageError, StorageResult};

/// File-backed [`DurableStore`].
///
/// Each operation does a full read-modify-write of the backing file; a
/// process-local mutex serializes concurrent access. The file is small (a
/// session snapshot and a token), so this stays well within reason.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by the given file path.
    ///
    /// The file is created lazily on first write.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| {
            StorageError::Encoding(format!(
                "Failed to parse store file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Load for a mutating operation. An unreadable file is discarded and
    /// treated as empty so that writes and removals can always proceed.
    fn load_for_write(&self) -> (BTreeMap<String, String>, bool) {
        match self.load() {
            Ok(entries) => (entries, false),
            Err(err) => {
                tracing::warn!(error = %err, "store file unreadable, resetting");
                (BTreeMap::new(), true)
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            file.write_all(contents.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)?;
        }

        Ok(())
    }
}

impl DurableStore for FileStore {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let (mut entries, _) = self.load_for_write();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        Ok(self.load()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let (mut entries, reset) = self.load_for_write();
        let removed = entries.remove(key).is_some();
        if removed || reset {
            self.save(&entries)?;
        }
        Ok(removed)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Backend("store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("credentials.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.has("anything").unwrap());
    }

    #[test]
    fn values_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let store = store_in(&dir);
        store.set("auth_token", "tok-1").unwrap();
        store.set("auth_user", r#"{"id":1}"#).unwrap();
        drop(store);

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.get("auth_token").unwrap(),
            Some("tok-1".to_string())
        );
        assert_eq!(
            reopened.get("auth_user").unwrap(),
            Some(r#"{"id":1}"#.to_string())
        );
    }

    #[test]
    fn remove_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set("auth_token", "tok-1").unwrap();
        assert!(store.remove("auth_token").unwrap());
        assert!(!store.remove("auth_token").unwrap());
        assert_eq!(store.get("auth_token").unwrap(), None);
    }

    #[test]
    fn corrupt_file_surfaces_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "this is not json{{{").unwrap();

        let store = FileStore::new(path);
        assert!(matches!(
            store.get("auth_user"),
            Err(StorageError::Encoding(_))
        ));
    }

    #[test]
    fn remove_resets_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "this is not json{{{").unwrap();

        let store = FileStore::new(path);
        assert!(!store.remove("auth_user").unwrap());
        // The corrupt file was discarded; reads work again.
        assert_eq!(store.get("auth_user").unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_permissions_are_restricted() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("auth_token", "tok-1").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
