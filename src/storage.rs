use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rand::{thread_rng, Rng};
use tracing::debug;

use crate::error::FolioError;

/// Raw string slots keyed by name. Implementations do no transformation or
/// validation of the stored text.
pub trait StoreAdapter: Send + Sync {
    fn read_raw(&self, key: &str) -> crate::Result<Option<String>>;

    /// Fails with [`FolioError::StorageUnavailable`] when the value cannot be
    /// stored (quota exceeded, backing store unwritable).
    fn write_raw(&self, key: &str, value: &str) -> crate::Result<()>;

    /// Removing a key that does not exist is not an error.
    fn remove_raw(&self, key: &str) -> crate::Result<()>;
}

/// Keys must be non-empty and made of ASCII alphanumerics, `_` or `-`, so
/// they map one-to-one onto file names.
pub fn validate_key(key: &str) -> crate::Result<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(FolioError::InvalidKey(key.to_string()))
    }
}

fn quota_error(quota: u64, needed: u64) -> FolioError {
    FolioError::StorageUnavailable(format!(
        "quota of {quota} bytes exceeded ({needed} bytes needed)"
    ))
}

/// In-process storage. Clones share the same slots, so a test can keep a
/// handle and inspect what a store persisted.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes of all stored values may not exceed `quota`. Keys are not
    /// counted, matching [`FileStorage`] where a value is a file's contents.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            slots: Arc::default(),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> crate::Result<usize> {
        let guard = self
            .slots
            .read()
            .map_err(|e| FolioError::StorageUnavailable(e.to_string()))?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> crate::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl StoreAdapter for MemoryStorage {
    fn read_raw(&self, key: &str) -> crate::Result<Option<String>> {
        let guard = self
            .slots
            .read()
            .map_err(|e| FolioError::StorageUnavailable(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write_raw(&self, key: &str, value: &str) -> crate::Result<()> {
        let mut guard = self
            .slots
            .write()
            .map_err(|e| FolioError::StorageUnavailable(e.to_string()))?;
        if let Some(quota) = self.quota {
            let others: usize = guard
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = (others + value.len()) as u64;
            if needed > quota {
                return Err(quota_error(quota, needed));
            }
        }
        guard.insert(key.to_string(), value.to_string());
        debug!(key, bytes = value.len(), "memory slot written");
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> crate::Result<()> {
        let mut guard = self
            .slots
            .write()
            .map_err(|e| FolioError::StorageUnavailable(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a data directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<u64>,
}

impl FileStorage {
    /// Opens (creating if needed) the data directory at `dir`.
    pub fn with_path(dir: impl AsRef<Path>) -> crate::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            FolioError::StorageUnavailable(format!("{}: {e}", dir.display()))
        })?;
        Ok(Self { dir, quota: None })
    }

    /// Caps the combined size of all slot files. `0` means no cap.
    pub fn quota(mut self, bytes: u64) -> Self {
        self.quota = if bytes == 0 { None } else { Some(bytes) };
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> crate::Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn used_bytes_excluding(&self, exclude: &Path) -> crate::Result<u64> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| FolioError::StorageUnavailable(e.to_string()))?;
        let mut total = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path == exclude || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                total += meta.len();
            }
        }
        Ok(total)
    }

    // Writes to a temp file next to the target and renames it into place, so
    // readers never see a half-written slot.
    fn atomic_write(&self, path: &Path, bytes: &[u8]) -> crate::Result<()> {
        let suffix: u64 = thread_rng().gen();
        let tmp = self.dir.join(format!(".tmp_folio.{suffix}.tmp"));
        fs::write(&tmp, bytes).map_err(|e| FolioError::StorageUnavailable(e.to_string()))?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(FolioError::StorageUnavailable(e.to_string()));
        }
        Ok(())
    }
}

impl StoreAdapter for FileStorage {
    fn read_raw(&self, key: &str) -> crate::Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| FolioError::StorageUnavailable(format!("{}: {e}", path.display())))
    }

    fn write_raw(&self, key: &str, value: &str) -> crate::Result<()> {
        let path = self.path_for(key)?;
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_excluding(&path)? + value.len() as u64;
            if needed > quota {
                return Err(quota_error(quota, needed));
            }
        }
        self.atomic_write(&path, value.as_bytes())?;
        debug!(key, bytes = value.len(), path = %path.display(), "slot file written");
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> crate::Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| FolioError::StorageUnavailable(format!("{}: {e}", path.display())))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_read_write_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read_raw("k").unwrap(), None);

        storage.write_raw("k", "v1").unwrap();
        storage.write_raw("k", "v2").unwrap();
        assert_eq!(storage.read_raw("k").unwrap().as_deref(), Some("v2"));

        storage.remove_raw("k").unwrap();
        assert_eq!(storage.read_raw("k").unwrap(), None);
        // removing twice is fine
        storage.remove_raw("k").unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_memory_clones_share_slots() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.write_raw("shared", "yes").unwrap();
        assert_eq!(b.read_raw("shared").unwrap().as_deref(), Some("yes"));
    }

    #[test]
    fn test_memory_quota_rejects_and_keeps_old_value() {
        let storage = MemoryStorage::with_quota(10);
        storage.write_raw("k", "12345").unwrap();

        let err = storage.write_raw("k", "123456789012").unwrap_err();
        assert!(matches!(err, FolioError::StorageUnavailable(_)));
        assert_eq!(storage.read_raw("k").unwrap().as_deref(), Some("12345"));

        // overwriting only counts the new value, not old + new
        storage.write_raw("k", "123456789").unwrap();
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let tmp_dir = TempDir::new().unwrap();
        let first = FileStorage::with_path(tmp_dir.path()).unwrap();
        first.write_raw("portfolio_db", r#"{"projects":[]}"#).unwrap();
        drop(first);

        let second = FileStorage::with_path(tmp_dir.path()).unwrap();
        assert_eq!(
            second.read_raw("portfolio_db").unwrap().as_deref(),
            Some(r#"{"projects":[]}"#)
        );
        assert!(tmp_dir.path().join("portfolio_db.json").exists());

        second.remove_raw("portfolio_db").unwrap();
        assert_eq!(second.read_raw("portfolio_db").unwrap(), None);
        second.remove_raw("portfolio_db").unwrap();
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let tmp_dir = TempDir::new().unwrap();
        let storage = FileStorage::with_path(tmp_dir.path()).unwrap();
        for i in 0..5 {
            storage.write_raw("slot", &i.to_string()).unwrap();
        }
        let names: Vec<String> = fs::read_dir(tmp_dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["slot.json".to_string()]);
    }

    #[test]
    fn test_file_storage_quota() {
        let tmp_dir = TempDir::new().unwrap();
        let storage = FileStorage::with_path(tmp_dir.path()).unwrap().quota(16);
        storage.write_raw("a", "0123456789").unwrap();

        let err = storage.write_raw("b", "0123456789").unwrap_err();
        assert!(matches!(err, FolioError::StorageUnavailable(_)));
        assert_eq!(storage.read_raw("b").unwrap(), None);

        storage.write_raw("a", "0123456789abcdef").unwrap();
    }

    #[test]
    fn test_quota_counts_values_alike_in_both_adapters() {
        let tmp_dir = TempDir::new().unwrap();
        let file = FileStorage::with_path(tmp_dir.path()).unwrap().quota(10);
        let memory = MemoryStorage::with_quota(10);
        let adapters: [&dyn StoreAdapter; 2] = [&file, &memory];

        for adapter in adapters {
            adapter.write_raw("long_key_name", "12345").unwrap();
            adapter.write_raw("another_long_key", "12345").unwrap();
            assert!(matches!(
                adapter.write_raw("third", "1"),
                Err(FolioError::StorageUnavailable(_))
            ));
        }
    }

    #[test]
    fn test_memory_len_reports_poisoned_lock() {
        let storage = MemoryStorage::new();
        storage.write_raw("k", "v").unwrap();
        assert_eq!(storage.len().unwrap(), 1);

        let slots = Arc::clone(&storage.slots);
        let _ = std::thread::spawn(move || {
            let _guard = slots.write().unwrap();
            panic!("poison the slot map");
        })
        .join();
        assert!(matches!(storage.len(), Err(FolioError::StorageUnavailable(_))));
        assert!(storage.is_empty().is_err());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let tmp_dir = TempDir::new().unwrap();
        let storage = FileStorage::with_path(tmp_dir.path()).unwrap();
        for key in ["", "../escape", "has space", "dot.json"] {
            assert!(matches!(
                storage.write_raw(key, "x"),
                Err(FolioError::InvalidKey(_))
            ));
        }
        assert!(validate_key("portfolio-db_2").is_ok());
    }
}
