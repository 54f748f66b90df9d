//! Key/value storage adapters
//!
//! `FileStorageProvider` keeps the session between runs in a JSON file:
//! - Linux: ~/.config/levelgate/storage.json
//! - macOS: ~/Library/Application Support/io.levelgate.client/storage.json
//! - Windows: C:\Users\<User>\AppData\Roaming\levelgate\client\config\storage.json
//!
//! `InMemoryStorageProvider` forgets everything when dropped.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;

use levelgate_app::application::ClientConfig;
use levelgate_ports::outbound::StorageProvider;

const STORAGE_FILE: &str = "storage.json";

type Entries = HashMap<String, String>;

/// File-backed storage with an in-memory cache
///
/// Reads are served from the cache. Every change rewrites the whole file from
/// a snapshot taken under the write lock; a no-op change writes nothing.
#[derive(Clone)]
pub struct FileStorageProvider {
    storage_path: PathBuf,
    cache: Arc<RwLock<Entries>>,
}

impl FileStorageProvider {
    /// Open the storage file in the per-user config directory
    pub fn new() -> Self {
        Self::at(default_storage_path())
    }

    /// Honour `LEVELGATE_STORAGE_PATH` when it is set
    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.storage_path {
            Some(path) => Self::at(path.clone()),
            None => Self::new(),
        }
    }

    /// Open (or lazily create) the storage file at `storage_path`
    pub fn at(storage_path: PathBuf) -> Self {
        let cache = match read_entries(&storage_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Entries::new(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = ?storage_path,
                    "Unreadable storage file, starting empty"
                );
                Entries::new()
            }
        };
        tracing::debug!(path = ?storage_path, entries = cache.len(), "File storage initialized");

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Apply `change` under the write lock and persist if it reports a change.
    fn update(&self, change: impl FnOnce(&mut Entries) -> bool) {
        let snapshot = match self.cache.write() {
            Ok(mut entries) => {
                if !change(&mut entries) {
                    return;
                }
                entries.clone()
            }
            Err(e) => {
                tracing::error!(error = %e, "Storage lock poisoned, change dropped");
                return;
            }
        };

        if let Err(e) = write_entries(&self.storage_path, &snapshot) {
            tracing::error!(
                error = %e,
                path = ?self.storage_path,
                "Failed to persist storage file"
            );
        }
    }
}

impl Default for FileStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn default_storage_path() -> PathBuf {
    match ProjectDirs::from("io", "levelgate", "client") {
        Some(dirs) => dirs.config_dir().join(STORAGE_FILE),
        None => PathBuf::from("levelgate_storage.json"),
    }
}

fn read_entries(path: &Path) -> io::Result<Entries> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn write_entries(path: &Path, entries: &Entries) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(entries)?)
}

impl StorageProvider for FileStorageProvider {
    fn save(&self, key: &str, value: &str) {
        self.update(|entries| {
            if entries.get(key).map(String::as_str) == Some(value) {
                return false;
            }
            entries.insert(key.to_string(), value.to_string());
            true
        });
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                tracing::error!(error = %e, "Storage lock poisoned, treating key as absent");
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        self.update(|entries| entries.remove(key).is_some());
    }
}

/// Process-local storage
#[derive(Clone, Default)]
pub struct InMemoryStorageProvider {
    data: Arc<RwLock<Entries>>,
}

impl InMemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for InMemoryStorageProvider {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut guard) = self.data.write() {
            guard.insert(key.to_string(), value.to_string());
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.data.read().ok()?.get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut guard) = self.data.write() {
            guard.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelgate_app::application::services::SessionService;
    use levelgate_domain::{SessionContext, UserId};
    use levelgate_ports::outbound::storage_keys;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STORAGE_FILE);

        let storage = FileStorageProvider::at(path.clone());
        storage.save(storage_keys::TOKEN, "jwt");
        storage.save(storage_keys::USER_ID, "u1");
        storage.remove(storage_keys::USER_ID);

        let reopened = FileStorageProvider::at(path);
        assert_eq!(reopened.load(storage_keys::TOKEN).as_deref(), Some("jwt"));
        assert!(reopened.load(storage_keys::USER_ID).is_none());
    }

    #[test]
    fn test_file_is_written_only_when_something_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);

        let storage = FileStorageProvider::at(path.clone());
        storage.remove(storage_keys::TOKEN);
        assert!(!path.exists());

        storage.save(storage_keys::TOKEN, "jwt");
        assert!(path.exists());

        let on_disk: Entries = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.get(storage_keys::TOKEN).map(String::as_str), Some("jwt"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);
        fs::write(&path, "[1, 2").unwrap();

        let storage = FileStorageProvider::at(path);
        assert!(storage.load(storage_keys::TOKEN).is_none());
    }

    #[test]
    fn test_config_override_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let config = ClientConfig {
            storage_path: Some(path.clone()),
            ..ClientConfig::default()
        };

        assert_eq!(FileStorageProvider::from_config(&config).path(), path.as_path());
    }

    #[test]
    fn test_session_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);
        let session = SessionContext::new(Some("jwt".into()), Some(UserId::new("u1")), None);

        SessionService::new(FileStorageProvider::at(path.clone())).save(&session);
        let loaded = SessionService::new(FileStorageProvider::at(path)).load();

        assert_eq!(loaded, session);
    }

    #[test]
    fn test_in_memory_storage() {
        let storage = InMemoryStorageProvider::new();
        let shared = storage.clone();

        storage.save("k", "v");
        assert_eq!(shared.load("k").as_deref(), Some("v"));

        shared.remove("k");
        assert!(storage.load("k").is_none());
    }
}
