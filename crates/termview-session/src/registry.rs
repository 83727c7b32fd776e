//! Session registry coordinating multiple terminal sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::info;

use termview_core::{Dimensions, Error, Result, SessionId, SessionSummary, SpawnSpec};
use termview_emulator::PtyBackend;

use crate::session::TerminalSession;

/// Configuration for the session registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum number of concurrent sessions
    pub max_sessions: usize,

    /// Default terminal rows
    pub default_rows: u16,

    /// Default terminal columns
    pub default_cols: u16,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_sessions: 16,
            default_rows: 40,
            default_cols: 120,
        }
    }
}

/// Registry of live terminal sessions.
///
/// The PTY spawning capability is injected at construction, so the
/// registry itself works the same against the native backend or a
/// test double.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<TerminalSession>>>,
    backend: Arc<dyn PtyBackend>,
    next_seq: AtomicU64,
    config: RegistryConfig,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Create a registry with default configuration.
    pub fn new(backend: Arc<dyn PtyBackend>) -> Self {
        Self::with_config(backend, RegistryConfig::default())
    }

    /// Create a registry with custom configuration.
    pub fn with_config(backend: Arc<dyn PtyBackend>, config: RegistryConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            backend,
            next_seq: AtomicU64::new(0),
            config,
        }
    }

    /// The PTY backend sessions are spawned against.
    pub fn backend(&self) -> &dyn PtyBackend {
        self.backend.as_ref()
    }

    /// Create a new session with no process.
    ///
    /// Session ids are assigned from a monotonic counter and never
    /// reused, even after removal.
    pub fn create(&self, dimensions: Option<Dimensions>) -> Result<Arc<TerminalSession>> {
        let dims = dimensions
            .unwrap_or_else(|| Dimensions::new(self.config.default_rows, self.config.default_cols));

        // Limit check and insert share one write-lock acquisition so
        // concurrent creates cannot exceed the configured maximum.
        let mut sessions = self.sessions.write().unwrap();
        if sessions.len() >= self.config.max_sessions {
            return Err(Error::SessionLimitReached(self.config.max_sessions));
        }

        let id = SessionId::from_seq(self.next_seq.fetch_add(1, Ordering::SeqCst));
        let session = Arc::new(TerminalSession::new(id.clone(), dims));
        sessions.insert(id, Arc::clone(&session));

        Ok(session)
    }

    /// Create a session and immediately spawn a process into it.
    pub fn create_spawned(
        &self,
        spec: &SpawnSpec,
        dimensions: Option<Dimensions>,
    ) -> Result<Arc<TerminalSession>> {
        let session = self.create(dimensions)?;
        if let Err(e) = session.spawn(self.backend.as_ref(), spec) {
            // Do not leave a dead entry behind.
            let _ = self.remove(session.id());
            return Err(e);
        }
        Ok(session)
    }

    /// Get a session by id.
    pub fn get(&self, id: &SessionId) -> Result<Arc<TerminalSession>> {
        let sessions = self.sessions.read().unwrap();
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound(id.clone()))
    }

    /// Remove a session from the registry.
    ///
    /// This only drops the registry's reference; callers that want the
    /// process gone destroy the session first.
    pub fn remove(&self, id: &SessionId) -> Result<Arc<TerminalSession>> {
        let mut sessions = self.sessions.write().unwrap();
        sessions
            .remove(id)
            .ok_or_else(|| Error::SessionNotFound(id.clone()))
    }

    /// Destroy a session and remove it from the registry.
    pub fn destroy(&self, id: &SessionId) -> Result<()> {
        let session = self.remove(id)?;
        session.destroy();
        info!("Session {} destroyed and removed", id);
        Ok(())
    }

    /// Summaries of all registered sessions, in creation order.
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = self.sessions.read().unwrap();
        let mut summaries: Vec<SessionSummary> =
            sessions.values().map(|s| s.summary()).collect();
        // Numeric sort: sess-2 sorts before sess-10
        summaries.sort_by_key(|s| s.id.seq());
        summaries
    }

    /// Number of registered sessions.
    pub fn count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}
