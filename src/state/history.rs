//! Undo/redo history.
//!
//! The manager keeps the snapshots *around* the current session, never the
//! current session itself; the caller owns that. History is linear: pushing
//! a new state throws away anything that was undone.
//!
//! ```text
//!   past: [A, B]   current: C   future: []
//!   undo  ──▶  past: [A]      current: B   future: [C]
//!   redo  ──▶  past: [A, B]   current: C   future: []
//!   push D ──▶ past: [A, B, C] current: D  future: []
//! ```

use std::collections::VecDeque;

use tracing::debug;

use super::session::CombatSession;

/// No bound on undo depth until `clear()`.
pub const DEFAULT_HISTORY_LIMIT: Option<usize> = None;

/// Two stacks of session snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    /// Oldest at the front
    past: VecDeque<CombatSession>,
    /// Next redo at the back
    future: Vec<CombatSession>,
    limit: Option<usize>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` undo steps, discarding the oldest first.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record the session being replaced. Clears the redo stack.
    pub fn push_state(&mut self, session: CombatSession) {
        self.past.push_back(session);
        self.future.clear();

        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
            }
        }

        debug!(undo = self.past.len(), "history push");
    }

    /// Step back. `current` moves onto the redo stack and the previous session
    /// is returned. Returns `None` with nothing to undo.
    pub fn undo(&mut self, current: &CombatSession) -> Option<CombatSession> {
        let previous = self.past.pop_back()?;
        self.future.push(current.clone());

        debug!(undo = self.past.len(), redo = self.future.len(), "history undo");
        Some(previous)
    }

    /// Step forward again. Inverse of [`undo`](Self::undo).
    pub fn redo(&mut self, current: &CombatSession) -> Option<CombatSession> {
        let next = self.future.pop()?;
        self.past.push_back(current.clone());

        debug!(undo = self.past.len(), redo = self.future.len(), "history redo");
        Some(next)
    }

    /// Empty both stacks (on session load).
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::participant::Participant;
    use crate::state::turn::advance_turn;
    use pretty_assertions::assert_eq;

    fn make_session() -> CombatSession {
        CombatSession::new(vec![
            Participant::new("Goblin", "monster", 14, 7).unwrap(),
            Participant::new("Barbarian", "pc", 10, 30).unwrap(),
        ])
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let a = make_session();
        let b = advance_turn(&a);
        let c = advance_turn(&b);

        let mut history = HistoryManager::new();
        history.push_state(a.clone());
        history.push_state(b.clone());
        // c is current

        let undone = history.undo(&c).unwrap();
        assert_eq!(undone, b);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 1);

        let redone = history.redo(&undone).unwrap();
        assert_eq!(redone, c);
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_undo_returns_pushed_state() {
        let a = make_session();
        let b = advance_turn(&a);

        let mut history = HistoryManager::new();
        history.push_state(a.clone());
        history.push_state(b.clone());

        // Current is b once it's been pushed and re-taken
        let current = history.undo(&advance_turn(&b)).unwrap();
        assert_eq!(current, b);
        let previous = history.undo(&current).unwrap();
        assert_eq!(previous, a);
        assert_eq!(history.redo_count(), 2);

        assert_eq!(history.redo(&previous).unwrap(), b);
    }

    #[test]
    fn test_undo_exhaustion() {
        let current = make_session();
        let mut history = HistoryManager::new();
        history.push_state(current.clone());
        history.undo(&advance_turn(&current)).unwrap();
        assert_eq!(history.redo_count(), 1);

        assert!(history.undo(&current).is_none());
        assert_eq!(history.redo_count(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_redo_on_empty() {
        let mut history = HistoryManager::new();
        assert!(history.redo(&make_session()).is_none());
        assert_eq!(history.undo_count(), 0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_future() {
        let a = make_session();
        let b = advance_turn(&a);
        let mut history = HistoryManager::new();

        history.push_state(a.clone());
        let current = history.undo(&b).unwrap();
        assert!(history.can_redo());

        history.push_state(current);
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn test_clear() {
        let a = make_session();
        let mut history = HistoryManager::new();
        history.push_state(a.clone());
        history.push_state(advance_turn(&a));
        history.undo(&a).unwrap();

        history.clear();
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_limit_discards_oldest() {
        let mut session = make_session();
        let first = session.clone();
        let mut history = HistoryManager::with_limit(2);

        for _ in 0..4 {
            let next = advance_turn(&session);
            history.push_state(std::mem::replace(&mut session, next));
        }

        assert_eq!(history.undo_count(), 2);
        let mut current = session;
        while let Some(previous) = history.undo(&current) {
            current = previous;
        }
        assert_ne!(current, first);
        assert_eq!(history.redo_count(), 2);
    }
}
