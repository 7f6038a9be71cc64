//! Persistence of the connected session across restarts.
//!
//! Two values are kept together: the credentials record and a `connected` flag.
//! Both are written only after a successful connect and cleared together.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::adapter::Credentials;

pub trait SessionStore: Send + Sync {
    /// Credentials of the last connected session, if one was persisted.
    fn load(&self) -> Option<Credentials>;
    fn save(&self, credentials: &Credentials);
    fn clear(&self);
}

/// Record written by the stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub connected: bool,
}

impl PersistedSession {
    fn connected(credentials: &Credentials) -> Self {
        Self {
            credentials: Some(credentials.clone()),
            connected: true,
        }
    }

    fn into_credentials(self) -> Option<Credentials> {
        if self.connected {
            self.credentials
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<PersistedSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with a connected session.
    pub fn with_session(credentials: &Credentials) -> Self {
        Self {
            record: Mutex::new(Some(PersistedSession::connected(credentials))),
        }
    }

    pub fn snapshot(&self) -> Option<PersistedSession> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Credentials> {
        self.snapshot()?.into_credentials()
    }

    fn save(&self, credentials: &Credentials) {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(PersistedSession::connected(credentials));
    }

    fn clear(&self) {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// JSON file store. A missing or corrupt file loads as "nothing persisted";
/// write failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location: `~/.config/bucket-console/session.json`.
    pub fn open_default() -> Self {
        Self::new(config_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<PersistedSession> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => {
                debug!("No session file at {}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str::<PersistedSession>(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Failed to parse session file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Credentials> {
        self.read()?.into_credentials()
    }

    fn save(&self, credentials: &Credentials) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(
                    "Failed to create session directory {}: {}",
                    parent.display(),
                    e
                );
                return;
            }
        }
        match serde_json::to_string_pretty(&PersistedSession::connected(credentials)) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!("Failed to write session file {}: {}", self.path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize session: {}", e),
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed session file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove session file {}: {}", self.path.display(), e),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("bucket-console");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("bucket-console");
    }
    PathBuf::from(".config").join("bucket-console")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn creds() -> Credentials {
        Credentials::new("AKIA", "secret", "eu-west-1", "media")
    }

    #[test]
    fn memory_store_round_trip_and_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load(), None);

        store.save(&creds());
        assert_eq!(store.load(), Some(creds()));

        store.clear();
        assert_eq!(store.load(), None);
        assert_eq!(store.snapshot(), None);
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path).save(&creds());
        assert_eq!(FileSessionStore::new(&path).load(), Some(creds()));

        FileSessionStore::new(&path).clear();
        assert!(!path.exists());
        assert_eq!(FileSessionStore::new(&path).load(), None);
    }

    #[test]
    fn file_store_ignores_corrupt_and_unflagged_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(FileSessionStore::new(&path).load(), None);

        let unflagged = PersistedSession {
            credentials: Some(creds()),
            connected: false,
        };
        std::fs::write(&path, serde_json::to_string(&unflagged).unwrap()).unwrap();
        assert_eq!(FileSessionStore::new(&path).load(), None);
    }

    #[test]
    fn clearing_a_missing_file_is_quiet() {
        let dir = TempDir::new().unwrap();
        FileSessionStore::new(dir.path().join("absent.json")).clear();
    }
}
