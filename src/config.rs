use std::path::PathBuf;

use crate::downloads::DEFAULT_DOWNLOADS_KEY;
use crate::error::FolioError;
use crate::storage::{validate_key, FileStorage};
use crate::store::DEFAULT_STORAGE_KEY;

/// Same ceiling browsers commonly give local storage.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct FolioConfig {
    pub home: PathBuf,
    pub storage_key: String,
    pub downloads_key: String,
    /// `0` disables the quota.
    pub quota_bytes: u64,
}

impl FolioConfig {
    /// Load configuration from environment variables.
    ///
    /// - FOLIO_HOME: data directory (default: per-OS application data dir)
    /// - FOLIO_STORAGE_KEY: record document key (default: portfolio_db)
    /// - FOLIO_DOWNLOADS_KEY: download log key (default: portfolio_downloads)
    /// - FOLIO_QUOTA_BYTES: storage quota in bytes, 0 for none (default: 5 MiB)
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`FolioConfig::from_env`] but reading variables through
    /// `lookup`, so callers and tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup("FOLIO_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::data_dir(&lookup));

        let storage_key =
            lookup("FOLIO_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        let downloads_key =
            lookup("FOLIO_DOWNLOADS_KEY").unwrap_or_else(|| DEFAULT_DOWNLOADS_KEY.to_string());
        for key in [&storage_key, &downloads_key] {
            validate_key(key)
                .map_err(|_| FolioError::Configuration(format!("invalid storage key {key:?}")))?;
        }
        if storage_key == downloads_key {
            return Err(FolioError::Configuration(
                "FOLIO_STORAGE_KEY and FOLIO_DOWNLOADS_KEY must differ".to_string(),
            ));
        }

        let quota_bytes = match lookup("FOLIO_QUOTA_BYTES") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                FolioError::Configuration(format!("FOLIO_QUOTA_BYTES is not a byte count: {raw}"))
            })?,
            None => DEFAULT_QUOTA_BYTES,
        };

        Ok(Self {
            home,
            storage_key,
            downloads_key,
            quota_bytes,
        })
    }

    fn data_dir<F>(lookup: &F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = |var: &str| lookup(var).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        if cfg!(target_os = "windows") {
            base("LOCALAPPDATA").join("folio-store")
        } else if cfg!(target_os = "macos") {
            base("HOME").join("Library/Application Support/folio-store")
        } else {
            base("HOME").join(".local/share/folio-store")
        }
    }

    pub fn open_storage(&self) -> crate::Result<FileStorage> {
        Ok(FileStorage::with_path(&self.home)?.quota(self.quota_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FolioConfig::from_lookup(lookup(&[("HOME", "/home/me")])).unwrap();
        assert_eq!(config.storage_key, "portfolio_db");
        assert_eq!(config.downloads_key, "portfolio_downloads");
        assert_eq!(config.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert!(config.home.ends_with("folio-store"));
    }

    #[test]
    fn test_overrides() {
        let config = FolioConfig::from_lookup(lookup(&[
            ("FOLIO_HOME", "/srv/folio"),
            ("FOLIO_STORAGE_KEY", "site"),
            ("FOLIO_DOWNLOADS_KEY", "site_downloads"),
            ("FOLIO_QUOTA_BYTES", "0"),
        ]))
        .unwrap();
        assert_eq!(config.home, PathBuf::from("/srv/folio"));
        assert_eq!(config.storage_key, "site");
        assert_eq!(config.downloads_key, "site_downloads");
        assert_eq!(config.quota_bytes, 0);
    }

    #[test]
    fn test_rejects_bad_values() {
        for vars in [
            vec![("FOLIO_QUOTA_BYTES", "lots")],
            vec![("FOLIO_STORAGE_KEY", "../db")],
            vec![("FOLIO_STORAGE_KEY", "same"), ("FOLIO_DOWNLOADS_KEY", "same")],
        ] {
            assert!(matches!(
                FolioConfig::from_lookup(lookup(&vars)),
                Err(FolioError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_open_storage_creates_home() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let home = tmp_dir.path().join("nested/home");
        let config = FolioConfig {
            home: home.clone(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            downloads_key: DEFAULT_DOWNLOADS_KEY.to_string(),
            quota_bytes: 0,
        };
        let storage = config.open_storage().unwrap();
        assert!(home.is_dir());
        assert_eq!(storage.dir(), home.as_path());
    }
}
