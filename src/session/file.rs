use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SessionError, SessionStore};
use crate::config::SessionConfig;

const STORAGE_FILE: &str = "local_storage.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StorageDocument {
    entries: HashMap<String, StorageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageEntry {
    value: String,
    updated_at: DateTime<Utc>,
}

/// Token persisted as one named entry of a JSON key/value document on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
}

pub fn default_storage_dir() -> Result<PathBuf, SessionError> {
    let home = std::env::var("HOME")
        .map_err(|_| SessionError::NoStorageDir("HOME environment variable not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join("admin-console"))
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE),
            key: key.into(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        let dir = match &config.storage_dir {
            Some(dir) => dir.clone(),
            None => default_storage_dir()?,
        };
        Ok(Self::new(dir, config.token_key.clone()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the current token was written, if there is one
    pub fn token_updated_at(&self) -> Result<Option<DateTime<Utc>>, SessionError> {
        Ok(self.load()?.entries.get(&self.key).map(|entry| entry.updated_at))
    }

    fn load(&self) -> Result<StorageDocument, SessionError> {
        if !self.path.exists() {
            return Ok(StorageDocument::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let document: StorageDocument = serde_json::from_str(&content)?;
        Ok(document)
    }

    /// Like `load`, but an unparseable document is replaced rather than
    /// reported. The flag is true when the on-disk file must be rewritten.
    fn load_for_write(&self) -> Result<(StorageDocument, bool), SessionError> {
        match self.load() {
            Ok(document) => Ok((document, false)),
            Err(SessionError::Json(err)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding corrupt session storage"
                );
                Ok((StorageDocument::default(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, document: &StorageDocument) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.load()?.entries.remove(&self.key).map(|entry| entry.value))
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let (mut document, _) = self.load_for_write()?;
        document.entries.insert(
            self.key.clone(),
            StorageEntry {
                value: token.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.save(&document)
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        let (mut document, reset) = self.load_for_write()?;
        if document.entries.remove(&self.key).is_none() && !reset {
            return Ok(());
        }
        tracing::debug!(path = %self.path.display(), "cleared persisted token");
        self.save(&document)
    }
}
