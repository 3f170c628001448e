//! Turn and round progression.
//!
//! # Cursor movement
//!
//! ```text
//!   advance:  (r, i) ──▶ (r, i+1)            while i+1 < n
//!             (r, n-1) ──▶ (r+1, 0)  + tick status effects
//!
//!   rewind:   (r, i) ──▶ (r, i-1)            while i > 0
//!             (r, 0) ──▶ (r-1, n-1)          while r > 1, effects NOT restored
//!             (1, 0) ──▶ (1, 0)
//! ```
//!
//! Every participant gets a turn, including unconscious ones.

use super::effects::{tick_status_effects_with_expired, ExpiredEffect};
use super::session::{CombatSession, FIRST_ROUND};

/// Result of advancing a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub session: CombatSession,
    /// Whether this advance started a new round
    pub new_round: bool,
    /// Effects that ran out at the round boundary
    pub expired: Vec<ExpiredEffect>,
}

/// Check whether advancing would move the cursor.
pub fn can_advance_turn(session: &CombatSession) -> bool {
    !session.is_empty()
}

/// Check whether rewinding would move the cursor.
pub fn can_rewind_turn(session: &CombatSession) -> bool {
    session.current_round_number() > FIRST_ROUND || session.current_turn_index() > 0
}

/// Advance to the next turn.
///
/// Wrapping past the last participant starts a new round and ticks every
/// participant's status effects. With no participants the session comes back
/// unchanged.
pub fn advance_turn(session: &CombatSession) -> CombatSession {
    advance_turn_with_report(session).session
}

/// Same as [`advance_turn`], also reporting round and expiry details.
pub fn advance_turn_with_report(session: &CombatSession) -> TurnOutcome {
    if !can_advance_turn(session) {
        return TurnOutcome {
            session: session.clone(),
            new_round: false,
            expired: Vec::new(),
        };
    }

    let next_index = (session.current_turn_index() + 1) % session.participant_count();

    if next_index != 0 {
        return TurnOutcome {
            session: session.moved_to(session.current_round_number(), next_index),
            new_round: false,
            expired: Vec::new(),
        };
    }

    let (participants, expired) = tick_status_effects_with_expired(session.participants());
    let next_round = session.current_round_number().saturating_add(1);

    TurnOutcome {
        session: session.with_participants(participants).moved_to(next_round, 0),
        new_round: true,
        expired,
    }
}

/// Go back to the previous turn.
///
/// Stops at round 1, turn 0. Crossing back over a round boundary does not
/// restore expired effects or re-increment durations.
pub fn rewind_turn(session: &CombatSession) -> CombatSession {
    if !can_rewind_turn(session) {
        return session.clone();
    }

    let index = session.current_turn_index();
    if index > 0 {
        return session.moved_to(session.current_round_number(), index - 1);
    }

    session.moved_to(
        session.current_round_number() - 1,
        session.participant_count().saturating_sub(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::id::{EffectId, ParticipantId};
    use crate::state::participant::{Participant, StatusEffect};
    use pretty_assertions::assert_eq;

    fn make_participant(name: &str, initiative: i32) -> Participant {
        Participant::new(name, "monster", initiative, 10)
            .unwrap()
            .with_id(name)
    }

    fn make_session() -> CombatSession {
        CombatSession::new(vec![
            make_participant("Barbarian", 10),
            make_participant("Goblin", 14),
            make_participant("Wizard", 8),
        ])
    }

    fn cursor(session: &CombatSession) -> (u32, usize) {
        (session.current_round_number(), session.current_turn_index())
    }

    #[test]
    fn test_advance_within_round() {
        let session = make_session();
        let next = advance_turn(&session);

        assert_eq!(cursor(&next), (1, 1));
        assert_eq!(next.current_participant().unwrap().name, "Barbarian");
        // Input untouched
        assert_eq!(cursor(&session), (1, 0));
    }

    #[test]
    fn test_advance_wraps_round() {
        let mut session = make_session();
        for _ in 0..3 {
            session = advance_turn(&session);
        }
        assert_eq!(cursor(&session), (2, 0));
        assert_eq!(session.current_participant().unwrap().name, "Goblin");
    }

    #[test]
    fn test_advance_empty_is_identity() {
        let session = CombatSession::new(Vec::new());
        assert!(!can_advance_turn(&session));
        assert_eq!(advance_turn(&session), session);
    }

    #[test]
    fn test_advance_single_participant_every_call_is_new_round() {
        let session = CombatSession::new(vec![make_participant("Solo", 5)]);
        let outcome = advance_turn_with_report(&session);
        assert!(outcome.new_round);
        assert_eq!(cursor(&outcome.session), (2, 0));
    }

    #[test]
    fn test_rewind_boundary() {
        let session = make_session();
        assert!(!can_rewind_turn(&session));
        assert_eq!(rewind_turn(&session), session);
    }

    #[test]
    fn test_rewind_within_round() {
        let session = advance_turn(&advance_turn(&make_session()));
        let back = rewind_turn(&session);
        assert_eq!(cursor(&back), (1, 1));
    }

    #[test]
    fn test_rewind_across_round() {
        let mut session = make_session();
        for _ in 0..3 {
            session = advance_turn(&session);
        }
        assert!(can_rewind_turn(&session));

        let back = rewind_turn(&session);
        assert_eq!(cursor(&back), (1, 2));
        assert_eq!(back.current_participant().unwrap().name, "Wizard");
    }

    #[test]
    fn test_rewind_empty_later_round() {
        let session = CombatSession::restore(None, Vec::new(), 3, 0);
        assert!(can_rewind_turn(&session));
        assert_eq!(cursor(&rewind_turn(&session)), (2, 0));
    }

    #[test]
    fn test_effect_expires_exactly_at_round_boundary() {
        let wizard = ParticipantId::from("Wizard");
        let stun = EffectId::from("stun");
        let session = make_session()
            .with_status_effect(&wizard, StatusEffect::timed("Stunned", 1).with_id("stun"));

        let after_one = advance_turn(&session);
        assert!(after_one.participant(&wizard).unwrap().has_status_effect(&stun));

        let after_two = advance_turn(&after_one);
        assert!(after_two.participant(&wizard).unwrap().has_status_effect(&stun));

        let outcome = advance_turn_with_report(&after_two);
        assert!(outcome.new_round);
        assert!(!outcome.session.participant(&wizard).unwrap().has_status_effect(&stun));
        assert_eq!(outcome.expired.len(), 1);
        assert_eq!(outcome.expired[0].participant_id, wizard);
    }

    #[test]
    fn test_effects_tick_once_per_round() {
        let goblin = ParticipantId::from("Goblin");
        let mut session = make_session()
            .with_status_effect(&goblin, StatusEffect::timed("Bless", 5).with_id("bless"));

        for _ in 0..6 {
            session = advance_turn(&session);
        }

        assert_eq!(cursor(&session), (3, 0));
        let bless = session
            .participant(&goblin)
            .unwrap()
            .status_effect(&EffectId::from("bless"))
            .unwrap();
        assert_eq!(bless.duration_in_rounds, Some(3));
    }

    #[test]
    fn test_rewind_does_not_restore_effects() {
        let goblin = ParticipantId::from("Goblin");
        let mut session = make_session()
            .with_status_effect(&goblin, StatusEffect::timed("Stunned", 1).with_id("stun"));
        for _ in 0..3 {
            session = advance_turn(&session);
        }

        let back = rewind_turn(&session);
        assert_eq!(cursor(&back), (1, 2));
        assert!(back.participant(&goblin).unwrap().status_effects.is_empty());
    }

    #[test]
    fn test_unconscious_participants_keep_their_turn() {
        let barbarian = ParticipantId::from("Barbarian");
        let session = make_session().with_hp(&barbarian, 0);

        let next = advance_turn(&session);
        assert!(next.is_participant_turn(&barbarian));
    }

    #[test]
    fn test_goblin_barbarian_wizard_scenario() {
        let session = make_session();
        let order: Vec<_> = session
            .participants()
            .iter()
            .map(|p| (p.name.as_str(), p.initiative_value))
            .collect();
        assert_eq!(order, vec![("Goblin", 14), ("Barbarian", 10), ("Wizard", 8)]);

        let mut session = session;
        for _ in 0..3 {
            session = advance_turn(&session);
        }
        assert_eq!(cursor(&session), (2, 0));
        assert!(can_rewind_turn(&session));

        let back = rewind_turn(&session);
        assert_eq!(cursor(&back), (1, 2));
        assert!(back.is_participant_turn(&ParticipantId::from("Wizard")));
    }
}
