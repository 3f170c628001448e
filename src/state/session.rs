//! Combat session model.
//!
//! A session is a value: every transition builds a new `CombatSession` and
//! leaves the old one intact, which is what lets the history stacks keep
//! snapshots without copying them defensively.

use serde::{Deserialize, Serialize};

use super::id::{ParticipantId, SessionId};
use super::initiative::sort_participants_by_initiative;
use super::participant::Participant;

/// Round number of a freshly started combat.
pub const FIRST_ROUND: u32 = 1;

/// The complete, persistable state of one combat encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SessionRecord")]
pub struct CombatSession {
    /// Assigned by the gateway on first save
    id: Option<SessionId>,

    /// Turn order, already sorted by initiative
    participants: Vec<Participant>,

    /// Current round (1-indexed)
    current_round_number: u32,

    /// Index into `participants` of whoever is acting
    current_turn_index: usize,
}

/// Wire form accepted on deserialization, clamped into a `CombatSession`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    #[serde(default)]
    id: Option<SessionId>,
    #[serde(default)]
    participants: Vec<Participant>,
    /// Wide and signed so out-of-range values clamp instead of failing
    #[serde(default = "first_round")]
    current_round_number: i64,
    #[serde(default)]
    current_turn_index: i64,
}

fn first_round() -> i64 {
    i64::from(FIRST_ROUND)
}

impl From<SessionRecord> for CombatSession {
    fn from(record: SessionRecord) -> Self {
        let round = u32::try_from(record.current_round_number.max(first_round()))
            .unwrap_or(u32::MAX);
        let turn = usize::try_from(record.current_turn_index.max(0)).unwrap_or(usize::MAX);

        Self::restore(record.id, record.participants, round, turn)
    }
}

impl CombatSession {
    /// Start a combat: sort by initiative, round 1, first participant's turn.
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            id: None,
            participants: sort_participants_by_initiative(&participants),
            current_round_number: FIRST_ROUND,
            current_turn_index: 0,
        }
    }

    /// Rebuild a session from stored parts (for restoring state).
    ///
    /// The participant order is taken as-is. Cursors are clamped: the round is
    /// at least 1 and the turn index is in range, or 0 with no participants.
    /// Expired effects are dropped and duplicate effect ids collapsed.
    pub fn restore(
        id: Option<SessionId>,
        mut participants: Vec<Participant>,
        current_round_number: u32,
        current_turn_index: usize,
    ) -> Self {
        for participant in &mut participants {
            participant.normalize_status_effects();
        }

        let current_turn_index = if participants.is_empty() {
            0
        } else {
            current_turn_index.min(participants.len() - 1)
        };

        Self {
            id,
            participants,
            current_round_number: current_round_number.max(FIRST_ROUND),
            current_turn_index,
        }
    }

    /// Parse the JSON session shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert to the JSON session shape.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "participants": self.participants,
            "currentRoundNumber": self.current_round_number,
            "currentTurnIndex": self.current_turn_index
        })
    }

    pub fn id(&self) -> Option<&SessionId> {
        self.id.as_ref()
    }

    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn current_round_number(&self) -> u32 {
        self.current_round_number
    }

    pub fn current_turn_index(&self) -> usize {
        self.current_turn_index
    }

    /// Participant count.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Get whoever is acting.
    pub fn current_participant(&self) -> Option<&Participant> {
        self.participants.get(self.current_turn_index)
    }

    /// Get a participant.
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Position of a participant in turn order.
    pub fn position_of(&self, id: &ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| &p.id == id)
    }

    /// Check if it's a participant's turn.
    pub fn is_participant_turn(&self, id: &ParticipantId) -> bool {
        self.current_participant().is_some_and(|p| &p.id == id)
    }

    /// Same session at new cursors.
    pub(crate) fn moved_to(&self, current_round_number: u32, current_turn_index: usize) -> Self {
        Self::restore(
            self.id.clone(),
            self.participants.clone(),
            current_round_number,
            current_turn_index,
        )
    }

    /// Same cursors over a new participant list, already in turn order.
    pub(crate) fn with_participants(&self, participants: Vec<Participant>) -> Self {
        Self::restore(
            self.id.clone(),
            participants,
            self.current_round_number,
            self.current_turn_index,
        )
    }

    /// Apply `edit` to one participant. Unknown ids leave the session unchanged.
    pub(crate) fn edit_participant<F>(&self, id: &ParticipantId, edit: F) -> Self
    where
        F: FnOnce(&mut Participant),
    {
        let mut participants = self.participants.clone();
        if let Some(p) = participants.iter_mut().find(|p| &p.id == id) {
            edit(p);
        }
        self.with_participants(participants)
    }

    /// Re-sort by initiative, keeping the turn with whoever holds it now.
    fn resorted(&self, participants: Vec<Participant>) -> Self {
        let acting = self.current_participant().map(|p| p.id.clone());
        let participants = sort_participants_by_initiative(&participants);

        let index = acting
            .and_then(|id| participants.iter().position(|p| p.id == id))
            .unwrap_or(self.current_turn_index);

        Self::restore(
            self.id.clone(),
            participants,
            self.current_round_number,
            index,
        )
    }

    /// Add a participant and re-sort initiative.
    ///
    /// Ties with existing participants act after them.
    pub fn with_participant_added(&self, participant: Participant) -> Self {
        let mut participants = self.participants.clone();
        participants.push(participant);
        self.resorted(participants)
    }

    /// Remove a participant.
    ///
    /// Removing someone ahead of the acting participant shifts the turn index
    /// down so the same participant keeps acting. Removing the acting
    /// participant hands the turn to whoever followed them, or to the new
    /// last participant if nobody did.
    pub fn with_participant_removed(&self, id: &ParticipantId) -> Self {
        let Some(pos) = self.position_of(id) else {
            return self.clone();
        };

        let mut participants = self.participants.clone();
        participants.remove(pos);

        let mut index = self.current_turn_index;
        if pos < index {
            index -= 1;
        }

        Self::restore(
            self.id.clone(),
            participants,
            self.current_round_number,
            index,
        )
    }

    /// Change a participant's initiative and re-sort.
    pub fn with_initiative(&self, id: &ParticipantId, initiative_value: i32) -> Self {
        if self.participant(id).is_none() {
            return self.clone();
        }

        let mut participants = self.participants.clone();
        for p in participants.iter_mut().filter(|p| &p.id == id) {
            p.initiative_value = initiative_value;
        }
        self.resorted(participants)
    }

    /// Set current HP directly. No clamping in either direction.
    pub fn with_hp(&self, id: &ParticipantId, current_hp: i32) -> Self {
        self.edit_participant(id, |p| p.current_hp = current_hp)
    }

    /// Subtract damage from current HP. HP may go below zero.
    /// Non-positive amounts are ignored.
    pub fn with_damage(&self, id: &ParticipantId, amount: i32) -> Self {
        if amount <= 0 {
            return self.clone();
        }
        self.edit_participant(id, |p| p.current_hp = p.current_hp.saturating_sub(amount))
    }

    /// Heal, capped at max HP. Non-positive amounts are ignored.
    ///
    /// A participant already above max HP is left where they are.
    pub fn with_healing(&self, id: &ParticipantId, amount: i32) -> Self {
        if amount <= 0 {
            return self.clone();
        }
        self.edit_participant(id, |p| {
            if p.current_hp < p.max_hp {
                p.current_hp = p.current_hp.saturating_add(amount).min(p.max_hp);
            }
        })
    }
}
