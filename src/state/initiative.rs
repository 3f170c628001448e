//! Initiative ordering.

use super::participant::Participant;

/// Order participants for turn rotation, highest initiative first.
///
/// Ties keep their relative input order, so sorting an already-sorted list
/// is a no-op.
pub fn sort_participants_by_initiative(participants: &[Participant]) -> Vec<Participant> {
    let mut sorted = participants.to_vec();
    // slice::sort_by is stable
    sorted.sort_by(|a, b| b.initiative_value.cmp(&a.initiative_value));
    sorted
}
