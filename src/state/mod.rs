//! Combat session state.
//!
//! This module provides the session engine:
//!
//! - `participant` - Combatant model and status effects
//! - `session` - Immutable session value with round/turn cursors
//! - `initiative` - Turn order
//! - `turn` - Advancing and rewinding turns
//! - `effects` - Round-boundary status effect ticking
//! - `history` - Undo/redo stacks
//! - `gateway` - Load/save contract and stores
//! - `tracker` - Holds one live session, its history and gateway
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     CombatTracker (per view)                     │
//! │                                                                  │
//! │   UI event ──▶ turn / effects ──▶ new CombatSession              │
//! │                                        │                         │
//! │                 ┌──────────────────────┴──────────┐              │
//! │                 ▼                                 ▼              │
//! │   ┌───────────────────────────┐    ┌──────────────────────────┐  │
//! │   │      HistoryManager       │    │      SessionGateway      │  │
//! │   │  past ◀── undo/redo ──▶   │    │  load_session (async)    │  │
//! │   │  future                   │    │  save_session (async)    │  │
//! │   └───────────────────────────┘    └──────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use initiative_state::state::{CombatTracker, MemorySessionStore, Participant};
//!
//! let mut tracker = CombatTracker::start(MemorySessionStore::new(), participants);
//! tracker.next_turn();
//! tracker.undo();
//! tracker.save().await?;
//! ```

pub mod effects;
pub mod gateway;
pub mod history;
pub mod id;
pub mod initiative;
pub mod participant;
pub mod session;
pub mod tracker;
pub mod turn;

// Re-export commonly used types
pub use effects::{tick_status_effects, tick_status_effects_with_expired, ExpiredEffect};
pub use gateway::{FileSessionStore, GatewayError, MemorySessionStore, SessionGateway};
pub use history::{HistoryManager, DEFAULT_HISTORY_LIMIT};
pub use id::{EffectId, ParticipantId, SessionId};
pub use initiative::sort_participants_by_initiative;
pub use participant::{Participant, ParticipantError, StatusEffect};
pub use session::{CombatSession, FIRST_ROUND};
pub use tracker::{CombatTracker, TrackerError};
pub use turn::{
    advance_turn, advance_turn_with_report, can_advance_turn, can_rewind_turn, rewind_turn,
    TurnOutcome,
};
