//! Persisted bearer credential.

use crate::utils::Result;
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;

/// Where the opaque session token lives between runs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored token, or `None` when there is none or it is unreadable.
    async fn load(&self) -> Option<String>;
    async fn store(&self, token: &str) -> Result<()>;
    /// Removes the token. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<()>;
}

/// On-disk layout; `token` is the fixed storage key.
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
}

/// Keeps the token in a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }

        match fs::read_to_string(&self.path).await {
            Ok(json) => match serde_json::from_str::<StoredCredential>(&json) {
                Ok(stored) if !stored.token.is_empty() => Some(stored.token),
                Ok(_) => None,
                Err(e) => {
                    warn!("Ignoring malformed credential file {}: {e}", self.path.display());
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read credential file {}: {e}", self.path.display());
                None
            }
        }
    }

    async fn store(&self, token: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string(&StoredCredential {
            token: token.to_string(),
        })?;
        fs::write(&self.path, json).await?;
        debug!("Credential saved to {}", self.path.display());

        Ok(())
    }

    /// Removes the file, or blanks the token in place when it cannot be removed.
    async fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        if let Err(e) = fs::remove_file(&self.path).await {
            warn!(
                "Failed to remove credential file {}: {e}; blanking it instead",
                self.path.display()
            );
            let json = serde_json::to_string(&StoredCredential {
                token: String::new(),
            })?;
            fs::write(&self.path, json).await?;
        }
        Ok(())
    }
}

/// Keeps the token in memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Synchronous peek, for assertions.
    pub fn current(&self) -> Option<String> {
        self.token.lock().ok().and_then(|token| token.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Option<String> {
        self.current()
    }

    async fn store(&self, token: &str) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}
