//! Durable storage for the session token and user snapshot

use log::warn;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::Result;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key of the JSON-serialized user snapshot
pub const USER_KEY: &str = "user";

/// String key-value storage that outlives the process
///
/// Only [`crate::auth::SessionStore`] writes to it; the access layer reads
/// the token from it on every request.
pub trait SessionStorage: Send + Sync {
    /// Read an entry
    fn get(&self, key: &str) -> Option<String>;

    /// Write an entry
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete an entry; deleting a missing entry is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage, mostly for tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-filled with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file
///
/// A missing file reads as empty. An unreadable or corrupt file also reads as
/// empty and is replaced on the next write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                warn!("Cannot read session file {}: {}", self.path.display(), err);
                return HashMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Ignoring corrupt session file {}: {}", self.path.display(), err);
            HashMap::new()
        })
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}
