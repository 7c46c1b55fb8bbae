//! Session persistence backends

use crate::core::models::User;
use crate::utils::error::{Result, StorefrontError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Current schema version of the persisted envelope
pub const PERSISTED_VERSION: u32 = 0;

/// Persisted envelope, shared by the store file and the session cookie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub state: PersistedState,
    #[serde(default)]
    pub version: u32,
    /// Only set on cookies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub current_user: Option<User>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
}

/// Storage for the session store between restarts
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    /// `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<PersistedSession>>;

    async fn save(&self, session: &PersistedSession) -> Result<()>;
}

/// Keeps the serialized envelope in memory
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an envelope, as if a previous run had saved it
    pub fn with_session(session: &PersistedSession) -> Result<Self> {
        Ok(Self {
            saved: Mutex::new(Some(serde_json::to_string(session)?)),
        })
    }

    pub fn raw(&self) -> Option<String> {
        self.saved.lock().clone()
    }
}

#[async_trait]
impl SessionPersistence for MemoryPersistence {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let raw = self.saved.lock().clone();
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        *self.saved.lock() = Some(serde_json::to_string(session)?);
        Ok(())
    }
}

/// JSON file on disk, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionPersistence for JsonFilePersistence {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                debug!("Loaded session state from {:?}", self.path);
                Ok(Some(serde_json::from_str(&content)?))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent).await?;

        let content = serde_json::to_vec_pretty(session)?;
        let path = self.path.clone();
        // Each save gets its own temp file in the target directory, then an atomic rename
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
            tmp.write_all(&content)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StorefrontError::internal(format!("session save task failed: {}", e)))??;

        debug!("Saved session state to {:?}", self.path);
        Ok(())
    }
}
