//! Process-wide bearer token storage.
//!
//! Pages never touch persistence directly; they are handed an
//! `Arc<dyn SessionStore>` so tests can swap in [`MemorySessionStore`].

pub mod file;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

pub use file::FileSessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No storage directory: {0}")]
    NoStorageDir(String),
}

/// Get/set/clear over a single persisted token.
///
/// No expiry or structural checks happen here; the server is trusted to
/// reject stale tokens.
pub trait SessionStore: Send + Sync {
    fn get_token(&self) -> Result<Option<String>, SessionError>;

    /// Overwrites any previous value
    fn set_token(&self, token: &str) -> Result<(), SessionError>;

    /// Clearing an absent token succeeds without effect
    fn clear_token(&self) -> Result<(), SessionError>;
}

/// In-memory session for tests and throwaway runs.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot().clone())
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}
