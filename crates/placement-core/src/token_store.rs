//! Persistence of the admin token between sessions.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("token store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub trait TokenStore: Send + Sync {
    /// The stored token exactly as saved, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    /// Store the token; an empty token clears the store.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Plain-text token file, by default `<data_dir>/placement-tracker/admin_token`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self, TokenStoreError> {
        let dir = dirs::data_dir().ok_or(TokenStoreError::NoDataDir)?;
        Ok(Self::new(dir.join("placement-tracker").join("admin_token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                // A hand-edited file may end in a newline; `save` never writes one.
                let token = content
                    .strip_suffix('\n')
                    .map(|t| t.strip_suffix('\r').unwrap_or(t))
                    .unwrap_or(content.as_str());
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if token.is_empty() {
            return self.clear();
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        std::fs::write(&self.path, token).map_err(|e| self.io_err(e))?;
        tracing::debug!(path = %self.path.display(), "saved admin token");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

/// In-process store, used by tests and when no data directory exists.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().map(|t| t.clone()).unwrap_or_default())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = (!token.is_empty()).then(|| token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.save("")
    }
}
