//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the in-memory session registry.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use study_assistant_core::ports::{
    PortError, PortResult, StudyMaterialService, TutorService,
};
use study_assistant_core::session::StudySession;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// State every handler sees: the two agent ports, the session registry,
/// and the startup configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub study_adapter: Arc<dyn StudyMaterialService>,
    pub tutor_adapter: Arc<dyn TutorService>,
    pub sessions: SessionRegistry,
}

//=========================================================================================
// SessionRegistry (Volatile Session Storage)
//=========================================================================================

/// A handle to one live session. Handlers lock it only for the moment they
/// read or mutate; agent calls always happen with the lock released.
pub type SessionHandle = Arc<Mutex<StudySession>>;

/// Process-local home of every study session.
///
/// Sessions are deliberately not persisted: notes, generated material, and
/// chat transcripts all vanish on restart, matching their advertised
/// lifetime. The outer lock guards only the map; per-session work contends
/// on the session's own mutex.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh session and returns a snapshot of its initial state.
    pub async fn create(&self) -> StudySession {
        let session = StudySession::new();
        let snapshot = session.clone();
        self.inner
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(session)));
        snapshot
    }

    /// Looks up a session handle and stamps its last access time.
    pub async fn get(&self, id: Uuid) -> PortResult<SessionHandle> {
        let handle = self
            .inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("session {id}")))?;
        handle.lock().await.touch();
        Ok(handle)
    }
}
