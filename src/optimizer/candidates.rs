use std::collections::{BTreeSet, HashSet};

use crate::boat::{Capability, CapabilitySet, Participant, ParticipantId, Weight};
use crate::optimizer::LineupError;

/// A pool participant eligible for at least one free seat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ParticipantId,
    pub weight: Weight,
    pub capabilities: CapabilitySet,
}

impl From<&Participant> for Candidate {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id,
            weight: participant.weight,
            capabilities: participant.capabilities,
        }
    }
}

/// Capability-tagged candidate lists, each in pool input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePool {
    pub locked_ids: BTreeSet<ParticipantId>,
    pub left: Vec<Candidate>,
    pub right: Vec<Candidate>,
    pub drum: Vec<Candidate>,
    pub steer: Vec<Candidate>,
    /// Union of `left` and `right` with each participant listed once.
    pub paddlers: Vec<Candidate>,
}

impl CandidatePool {
    /// Split the pool by capability, leaving out participants consumed by locked seats
    /// and, when `exclude_substitutes` is set, substitutes.
    pub fn resolve<I>(
        participants: &[Participant],
        locked: I,
        exclude_substitutes: bool,
    ) -> Result<Self, LineupError>
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        let mut seen = HashSet::with_capacity(participants.len());
        for participant in participants {
            if !seen.insert(participant.id) {
                return Err(LineupError::DuplicateParticipant(participant.id));
            }
        }

        let mut pool = Self {
            locked_ids: locked.into_iter().collect(),
            ..Self::default()
        };

        for participant in participants {
            if pool.locked_ids.contains(&participant.id)
                || (exclude_substitutes && participant.is_substitute)
            {
                continue;
            }
            let candidate = Candidate::from(participant);
            for capability in participant.capabilities.iter() {
                pool.list_mut(capability).push(candidate);
            }
            if participant.capabilities.can_paddle() {
                pool.paddlers.push(candidate);
            }
        }

        Ok(pool)
    }

    pub fn for_capability(&self, capability: Capability) -> &[Candidate] {
        match capability {
            Capability::Left => &self.left,
            Capability::Right => &self.right,
            Capability::Drum => &self.drum,
            Capability::Steer => &self.steer,
        }
    }

    fn list_mut(&mut self, capability: Capability) -> &mut Vec<Candidate> {
        match capability {
            Capability::Left => &mut self.left,
            Capability::Right => &mut self.right,
            Capability::Drum => &mut self.drum,
            Capability::Steer => &mut self.steer,
        }
    }
}
