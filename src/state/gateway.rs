//! Session persistence boundary.
//!
//! The engine only needs load and save. Both are async and may fail; neither
//! is retried here. Two stores ship with the crate: an in-memory map (tests,
//! single-process use) and a directory of JSON files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::id::SessionId;
use super::session::CombatSession;

/// Gateway failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session id is not storable: {0}")]
    InvalidId(SessionId),

    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored session {id} is corrupt")]
    Corrupt {
        id: SessionId,
        #[source]
        source: serde_json::Error,
    },
}

/// Load/save contract to durable storage.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Load a session by id.
    async fn load_session(&self, id: &SessionId) -> Result<CombatSession, GatewayError>;

    /// Persist a session, returning its id. Sessions without one get a fresh
    /// id; saving again with the same id overwrites.
    async fn save_session(&self, session: &CombatSession) -> Result<SessionId, GatewayError>;
}

#[async_trait]
impl<G: SessionGateway + ?Sized> SessionGateway for Arc<G> {
    async fn load_session(&self, id: &SessionId) -> Result<CombatSession, GatewayError> {
        (**self).load_session(id).await
    }

    async fn save_session(&self, session: &CombatSession) -> Result<SessionId, GatewayError> {
        (**self).save_session(session).await
    }
}

/// In-process session store.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, CombatSession>>,
    available: AtomicBool,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backing store going down or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), GatewayError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GatewayError::Unavailable("memory store offline".to_string()))
        }
    }

    /// Stored session count.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionGateway for MemorySessionStore {
    async fn load_session(&self, id: &SessionId) -> Result<CombatSession, GatewayError> {
        self.check_available()?;

        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn save_session(&self, session: &CombatSession) -> Result<SessionId, GatewayError> {
        self.check_available()?;

        let id = session.id().cloned().unwrap_or_else(SessionId::generate);
        self.sessions
            .write()
            .await
            .insert(id.clone(), session.clone().with_id(id.clone()));

        debug!(session_id = %id, "stored session in memory");
        Ok(id)
    }
}

/// One JSON file per session under a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids become file names, so only `[A-Za-z0-9_-]` is allowed.
    fn path_for(&self, id: &SessionId) -> Result<PathBuf, GatewayError> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(GatewayError::InvalidId(id.clone()));
        }

        Ok(self.dir.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl SessionGateway for FileSessionStore {
    async fn load_session(&self, id: &SessionId) -> Result<CombatSession, GatewayError> {
        let path = self.path_for(id)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GatewayError::NotFound(id.clone()));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read session file");
                return Err(GatewayError::Unavailable(e.to_string()));
            }
        };

        let session = CombatSession::from_json(&contents).map_err(|source| {
            GatewayError::Corrupt {
                id: id.clone(),
                source,
            }
        })?;

        // The file name is authoritative; a copied file may carry another id
        Ok(session.with_id(id.clone()))
    }

    async fn save_session(&self, session: &CombatSession) -> Result<SessionId, GatewayError> {
        let id = session.id().cloned().unwrap_or_else(SessionId::generate);
        let path = self.path_for(&id)?;

        let body = serde_json::to_string_pretty(&session.clone().with_id(id.clone()))
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        // Write then rename so a crash never leaves a half-written session
        let tmp = path.with_extension("json.tmp");
        let unavailable = |e: std::io::Error| GatewayError::Unavailable(e.to_string());
        tokio::fs::create_dir_all(&self.dir).await.map_err(unavailable)?;

        let written = match tokio::fs::write(&tmp, body).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!(path = %path.display(), error = %e, "failed to write session file");
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(unavailable(e));
        }

        debug!(session_id = %id, path = %path.display(), "wrote session file");
        Ok(id)
    }
}
