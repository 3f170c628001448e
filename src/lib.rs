//! Initiative State Library
//!
//! This crate provides the combat session engine for a tabletop RPG tracker.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Initiative Order** - Participants sorted by initiative, highest first,
//!   with ties kept in the order they were added.
//!
//! - **Turn Control** - Advancing and rewinding the turn cursor. Wrapping past
//!   the last participant starts a new round and ticks status effects.
//!
//! - **Undo/Redo** - A linear history of session snapshots per tracker.
//!
//! - **Persistence Boundary** - An async load/save gateway with in-memory and
//!   JSON file stores.
//!
//! # Design Principles
//!
//! 1. **Sessions are values** - Every transition returns a new session and
//!    never touches the old one.
//!
//! 2. **Boundaries are no-ops, not errors** - Advancing with nobody in combat,
//!    rewinding past round 1, and undoing with empty history do nothing.
//!
//! 3. **Only storage fails** - Load and save errors reach the caller; nothing
//!    is rolled back or retried.
//!
//! 4. **Serialization-ready** - Sessions round-trip through the JSON shape
//!    clients exchange.
//!
//! # Example
//!
//! ```rust
//! use initiative_state::state::{
//!     advance_turn, can_rewind_turn, rewind_turn, CombatSession, HistoryManager, Participant,
//! };
//!
//! let session = CombatSession::new(vec![
//!     Participant::new("Barbarian", "pc", 10, 30).unwrap(),
//!     Participant::new("Goblin", "monster", 14, 7).unwrap(),
//!     Participant::new("Wizard", "pc", 8, 18).unwrap(),
//! ]);
//! assert_eq!(session.current_participant().unwrap().name, "Goblin");
//!
//! let mut history = HistoryManager::new();
//! let mut current = session;
//! for _ in 0..3 {
//!     let next = advance_turn(&current);
//!     history.push_state(std::mem::replace(&mut current, next));
//! }
//! assert_eq!(current.current_round_number(), 2);
//! assert!(can_rewind_turn(&current));
//!
//! let rewound = rewind_turn(&current);
//! assert_eq!(rewound.current_participant().unwrap().name, "Wizard");
//!
//! let undone = history.undo(&current).unwrap();
//! assert_eq!(undone.current_turn_index(), 2);
//! assert_eq!(history.redo_count(), 1);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
