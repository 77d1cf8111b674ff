//! In-process registry of live sessions.
//!
//! Sessions are keyed by a ULID in a `DashMap`. Each slot pairs a mutex that
//! serialises writers with a published read-only view, so readers never wait
//! on a mutation in progress: they see the last committed view.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use ulid::Ulid;

use crate::domain::session::GameSession;
use crate::domain::snapshot::{SessionSnapshot, SessionView};
use crate::errors::domain::GameError;
use crate::errors::error_code::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Ulid);

impl SessionId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error(transparent)]
    Game(#[from] GameError),
}

impl RegistryError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            RegistryError::NotFound(_) => None,
            RegistryError::Game(err) => Some(err.code()),
        }
    }
}

struct SessionSlot {
    session: Mutex<GameSession>,
    view: RwLock<Arc<SessionView>>,
}

/// Concurrent host for many sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<SessionSlot>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|e| *e.key()).collect()
    }

    /// Host a session under a fresh id.
    pub fn insert(&self, session: GameSession) -> Result<SessionId, RegistryError> {
        let view = Arc::new(session.view()?);
        let id = SessionId::new();
        self.sessions.insert(
            id,
            Arc::new(SessionSlot {
                session: Mutex::new(session),
                view: RwLock::new(view),
            }),
        );
        info!(session_id = %id, "Session registered");
        Ok(id)
    }

    /// Rebuild a session from a snapshot and host it.
    pub fn restore(&self, snapshot: &SessionSnapshot) -> Result<SessionId, RegistryError> {
        let session = GameSession::reconstruct(snapshot)?;
        self.insert(session)
    }

    fn slot(&self, id: SessionId) -> Result<Arc<SessionSlot>, RegistryError> {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Run `f` against a working copy of the session. The copy replaces the
    /// hosted session, and a new view is published, only if `f` succeeds.
    pub fn mutate<T, F>(&self, id: SessionId, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, GameError>,
    {
        let slot = self.slot(id)?;
        let mut session = slot.session.lock();
        let mut working = session.clone();
        let out = f(&mut working)?;
        let view = Arc::new(working.view()?);
        *session = working;
        *slot.view.write() = view;
        debug!(session_id = %id, "Session mutated");
        Ok(out)
    }

    /// Last committed view; never blocks on an in-flight mutation.
    pub fn view(&self, id: SessionId) -> Result<Arc<SessionView>, RegistryError> {
        let slot = self.slot(id)?;
        let view = slot.view.read().clone();
        Ok(view)
    }

    pub fn snapshot(&self, id: SessionId) -> Result<SessionSnapshot, RegistryError> {
        let slot = self.slot(id)?;
        let session = slot.session.lock();
        Ok(session.serialize()?)
    }

    pub fn remove(&self, id: SessionId) -> Result<(), RegistryError> {
        self.sessions
            .remove(&id)
            .map(|_| info!(session_id = %id, "Session removed"))
            .ok_or(RegistryError::NotFound(id))
    }
}
