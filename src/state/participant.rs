//! Participant model.
//!
//! One combatant's combat-relevant state. The engine reads `initiative_value`
//! for ordering and `status_effects` for round ticking; everything else is
//! carried through untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{EffectId, ParticipantId};

/// A named, optionally time-limited modifier attached to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    pub id: EffectId,
    pub name: String,
    /// Remaining rounds. `None` means permanent.
    pub duration_in_rounds: Option<i32>,
}

impl StatusEffect {
    /// Create an effect lasting a number of rounds.
    pub fn timed(name: impl Into<String>, rounds: i32) -> Self {
        Self {
            id: EffectId::generate(),
            name: name.into(),
            duration_in_rounds: Some(rounds),
        }
    }

    /// Create an effect that never expires on its own.
    pub fn permanent(name: impl Into<String>) -> Self {
        Self {
            id: EffectId::generate(),
            name: name.into(),
            duration_in_rounds: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<EffectId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_permanent(&self) -> bool {
        self.duration_in_rounds.is_none()
    }

    /// A timed effect at zero or fewer rounds must be removed.
    pub fn is_expired(&self) -> bool {
        matches!(self.duration_in_rounds, Some(rounds) if rounds <= 0)
    }
}

/// Participant construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    #[error("max HP must be positive, got {0}")]
    InvalidMaxHp(i32),
}

/// A single combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,

    pub name: String,

    /// Creature category label, display only
    #[serde(rename = "type")]
    pub kind: String,

    /// Higher acts first
    pub initiative_value: i32,

    /// May drop to zero or below (unconscious); never clamped on read
    #[serde(rename = "currentHP")]
    pub current_hp: i32,

    #[serde(rename = "maxHP")]
    pub max_hp: i32,

    /// Effect ids are unique within one participant
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
}

impl Participant {
    /// Create a participant at full health with a fresh id.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        initiative_value: i32,
        max_hp: i32,
    ) -> Result<Self, ParticipantError> {
        if max_hp <= 0 {
            return Err(ParticipantError::InvalidMaxHp(max_hp));
        }

        Ok(Self {
            id: ParticipantId::generate(),
            name: name.into(),
            kind: kind.into(),
            initiative_value,
            current_hp: max_hp,
            max_hp,
            status_effects: Vec::new(),
        })
    }

    pub fn with_id(mut self, id: impl Into<ParticipantId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_current_hp(mut self, current_hp: i32) -> Self {
        self.current_hp = current_hp;
        self
    }

    pub fn with_status_effect(mut self, effect: StatusEffect) -> Self {
        self.put_status_effect(effect);
        self
    }

    /// Unconscious participants still take their turn in rotation.
    pub fn is_unconscious(&self) -> bool {
        self.current_hp <= 0
    }

    /// Get an effect by id.
    pub fn status_effect(&self, effect_id: &EffectId) -> Option<&StatusEffect> {
        self.status_effects.iter().find(|e| &e.id == effect_id)
    }

    /// Check if an effect is attached.
    pub fn has_status_effect(&self, effect_id: &EffectId) -> bool {
        self.status_effect(effect_id).is_some()
    }

    /// Drop expired effects and collapse duplicate ids, the last entry
    /// replacing the first in place.
    pub(crate) fn normalize_status_effects(&mut self) {
        let effects = std::mem::take(&mut self.status_effects);
        for effect in effects {
            self.put_status_effect(effect);
        }
    }

    /// Insert an effect, replacing any existing entry with the same id in place.
    /// An already-expired effect is never stored and clears an entry with its id.
    pub(crate) fn put_status_effect(&mut self, effect: StatusEffect) {
        if effect.is_expired() {
            self.status_effects.retain(|e| e.id != effect.id);
            return;
        }

        match self.status_effects.iter_mut().find(|e| e.id == effect.id) {
            Some(existing) => *existing = effect,
            None => self.status_effects.push(effect),
        }
    }
}
