//! Combat tracker: the one place a live session is held.
//!
//! Each tracker owns its current session, its own undo/redo history and a
//! gateway handle. UI events map one-to-one onto tracker calls:
//!
//! | Event        | Call                  |
//! |--------------|-----------------------|
//! | advance turn | [`CombatTracker::next_turn`]     |
//! | rewind turn  | [`CombatTracker::previous_turn`] |
//! | undo         | [`CombatTracker::undo`]          |
//! | redo         | [`CombatTracker::redo`]          |
//!
//! Transitions are synchronous. Only `load` and `save` suspend, and a failed
//! save leaves the in-memory session and history exactly as they were.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::effects::ExpiredEffect;
use super::gateway::{GatewayError, SessionGateway};
use super::history::HistoryManager;
use super::id::SessionId;
use super::participant::Participant;
use super::session::CombatSession;
use super::turn::{advance_turn_with_report, can_advance_turn, can_rewind_turn, rewind_turn};

/// Tracker errors. Both are recoverable; retry by calling again.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Failed to load session")]
    Load(#[source] GatewayError),

    #[error("Failed to save session")]
    Save(#[source] GatewayError),
}

/// Live combat state for one session view.
#[derive(Debug)]
pub struct CombatTracker<G> {
    gateway: G,
    session: CombatSession,
    history: HistoryManager,
    /// Known once loaded or first saved
    session_id: Option<SessionId>,
    last_saved_at: Option<DateTime<Utc>>,
}

impl<G: SessionGateway> CombatTracker<G> {
    /// Start a new combat from unsorted participants.
    pub fn start(gateway: G, participants: Vec<Participant>) -> Self {
        Self::with_session(gateway, CombatSession::new(participants), HistoryManager::new())
    }

    /// Track an existing session with the given (usually empty) history.
    pub fn with_session(gateway: G, session: CombatSession, history: HistoryManager) -> Self {
        Self {
            gateway,
            session_id: session.id().cloned(),
            session,
            history,
            last_saved_at: None,
        }
    }

    /// Load a session. Nothing is constructed on failure.
    pub async fn load(gateway: G, id: &SessionId) -> Result<Self, TrackerError> {
        let session = load_from(&gateway, id).await?;
        Ok(Self::with_session(gateway, session, HistoryManager::new()))
    }

    /// Replace the current session with a stored one and clear history.
    /// On failure the tracker is left untouched.
    pub async fn reload(&mut self, id: &SessionId) -> Result<(), TrackerError> {
        let session = load_from(&self.gateway, id).await?;

        self.session_id = session.id().cloned();
        self.session = session;
        self.history.clear();
        self.last_saved_at = None;
        Ok(())
    }

    /// Persist the current session.
    ///
    /// The first successful save records the assigned id on the current
    /// session without creating a history step.
    pub async fn save(&mut self) -> Result<SessionId, TrackerError> {
        let id = match self.gateway.save_session(&self.session).await {
            Ok(id) => id,
            Err(e) => {
                warn!(session_id = ?self.session_id, error = %e, "session save failed");
                return Err(TrackerError::Save(e));
            }
        };

        if self.session.id() != Some(&id) {
            self.session = self.session.clone().with_id(id.clone());
        }
        self.session_id = Some(id.clone());
        self.last_saved_at = Some(Utc::now());

        info!(session_id = %id, round = self.session.current_round_number(), "session saved");
        Ok(id)
    }

    /// Advance the turn. Returns any effects that expired at a round boundary.
    pub fn next_turn(&mut self) -> Vec<ExpiredEffect> {
        let outcome = advance_turn_with_report(&self.session);

        if outcome.new_round {
            info!(round = outcome.session.current_round_number(), "new round");
        }
        for expired in &outcome.expired {
            info!(
                participant = %expired.participant_name,
                effect = %expired.effect.name,
                "status effect expired"
            );
        }

        self.commit(outcome.session);
        outcome.expired
    }

    /// Rewind the turn. Returns false at round 1, turn 0.
    pub fn previous_turn(&mut self) -> bool {
        let previous = rewind_turn(&self.session);
        self.commit(previous)
    }

    /// Apply a reversible edit, e.g. `|s| s.with_damage(&id, 5)`.
    /// Returns false when the edit changed nothing.
    pub fn apply<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&CombatSession) -> CombatSession,
    {
        let next = edit(&self.session);
        self.commit(next)
    }

    /// Returns false with nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.session) {
            Some(previous) => {
                self.session = self.adopt(previous);
                true
            }
            None => false,
        }
    }

    /// Returns false with nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.session) {
            Some(next) => {
                self.session = self.adopt(next);
                true
            }
            None => false,
        }
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// When the current session was last saved successfully.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn can_advance(&self) -> bool {
        can_advance_turn(&self.session)
    }

    pub fn can_rewind(&self) -> bool {
        can_rewind_turn(&self.session)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    /// Make `next` current, recording the old session. No-ops leave history alone.
    fn commit(&mut self, next: CombatSession) -> bool {
        if next == self.session {
            return false;
        }

        let previous = std::mem::replace(&mut self.session, next);
        self.history.push_state(previous);

        debug!(
            round = self.session.current_round_number(),
            turn = self.session.current_turn_index(),
            "session updated"
        );
        true
    }

    /// Snapshots taken before the first save have no id; give them ours.
    fn adopt(&self, session: CombatSession) -> CombatSession {
        match (&self.session_id, session.id()) {
            (Some(id), None) => session.with_id(id.clone()),
            _ => session,
        }
    }
}

async fn load_from<G: SessionGateway>(
    gateway: &G,
    id: &SessionId,
) -> Result<CombatSession, TrackerError> {
    match gateway.load_session(id).await {
        Ok(session) => {
            info!(session_id = %id, participants = session.participant_count(), "session loaded");
            // Stores may hand back a session without its own id set
            Ok(match session.id() {
                Some(_) => session,
                None => session.with_id(id.clone()),
            })
        }
        Err(e) => {
            warn!(session_id = %id, error = %e, "session load failed");
            Err(TrackerError::Load(e))
        }
    }
}
