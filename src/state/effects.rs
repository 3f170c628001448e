//! Status-effect ticking.
//!
//! Timed effects count down once per round boundary, never per turn. The
//! turn controller calls [`tick_status_effects_with_expired`] exactly when
//! advancing wraps back to the first participant.

use super::id::{EffectId, ParticipantId};
use super::participant::{Participant, StatusEffect};
use super::session::CombatSession;

/// An effect removed by a round tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredEffect {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    /// The effect as it was before the tick
    pub effect: StatusEffect,
}

/// Count every timed effect down by one round and drop the ones that run out.
///
/// Permanent effects are untouched. Surviving effects keep their order.
pub fn tick_status_effects(participants: &[Participant]) -> Vec<Participant> {
    tick_status_effects_with_expired(participants).0
}

/// Same as [`tick_status_effects`], also returning what expired.
pub fn tick_status_effects_with_expired(
    participants: &[Participant],
) -> (Vec<Participant>, Vec<ExpiredEffect>) {
    let mut expired = Vec::new();

    let ticked = participants
        .iter()
        .map(|participant| {
            let mut next = participant.clone();
            next.status_effects = participant
                .status_effects
                .iter()
                .filter_map(|effect| match effect.duration_in_rounds {
                    None => Some(effect.clone()),
                    Some(rounds) => {
                        let remaining = rounds.saturating_sub(1);
                        if remaining <= 0 {
                            expired.push(ExpiredEffect {
                                participant_id: participant.id.clone(),
                                participant_name: participant.name.clone(),
                                effect: effect.clone(),
                            });
                            None
                        } else {
                            Some(StatusEffect {
                                duration_in_rounds: Some(remaining),
                                ..effect.clone()
                            })
                        }
                    }
                })
                .collect();
            next
        })
        .collect();

    (ticked, expired)
}

impl CombatSession {
    /// Attach an effect to a participant.
    ///
    /// An effect with the same id is replaced in place. Effects that are
    /// already expired are not attached.
    pub fn with_status_effect(&self, participant_id: &ParticipantId, effect: StatusEffect) -> Self {
        self.edit_participant(participant_id, |p| p.put_status_effect(effect))
    }

    /// Detach an effect from a participant.
    pub fn with_status_effect_removed(
        &self,
        participant_id: &ParticipantId,
        effect_id: &EffectId,
    ) -> Self {
        self.edit_participant(participant_id, |p| {
            p.status_effects.retain(|e| &e.id != effect_id)
        })
    }
}
