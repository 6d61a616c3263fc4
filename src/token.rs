//! Durable storage for the single session token.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait TokenStore: Send + Sync {
    /// Current token, `None` when nothing (or an empty string) is stored.
    fn get(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<(), TokenError>;
    fn remove(&self) -> Result<(), TokenError>;
}

/// Keeps the token in one file under the configured data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> TokenError {
        TokenError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    debug!(?err, path = %self.path.display(), "token file unreadable; treating as absent");
                }
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        fs::write(&self.path, token).map_err(|e| self.io_err(e))
    }

    fn remove(&self) -> Result<(), TokenError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_err(err)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        let guard = self.token.read().unwrap_or_else(|e| e.into_inner());
        guard.clone().filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) -> Result<(), TokenError> {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenError> {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}
