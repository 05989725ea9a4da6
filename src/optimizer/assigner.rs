//! Phase A (capability-exclusive seats) and phase D (finalize) of the lineup pipeline.

use log::debug;

use crate::boat::{Capability, Participant, Seat, Side};
use crate::optimizer::candidates::CandidatePool;
use crate::optimizer::partial::{PartialAssignment, Slot};
use crate::optimizer::{BalanceSummary, LineupResult, Occupant, SeatAssignment, ShortageNote};

/// Fill drum then steer from their candidate lists.
///
/// The most specialised candidate wins (fewest capabilities), so versatile
/// paddlers stay in the general pool; ties go to the lowest id.
pub fn fill_exclusive_seats(
    mut partial: PartialAssignment,
    pool: &CandidatePool,
) -> PartialAssignment {
    for (seat, capability) in [(Seat::Drum, Capability::Drum), (Seat::Steer, Capability::Steer)] {
        if !partial.is_free(seat) {
            continue;
        }
        let pick = pool
            .for_capability(capability)
            .iter()
            .filter(|candidate| !partial.is_seated(candidate.id))
            .min_by_key(|candidate| (candidate.capabilities.len(), candidate.id))
            .copied();
        match pick {
            Some(candidate) => {
                debug!("{seat}: placing {} ({} capabilities)", candidate.id, candidate.capabilities.len());
                partial.assign(seat, candidate);
            }
            None => debug!("{seat}: no {capability} candidate left"),
        }
    }
    partial
}

/// Turn the final partial assignment into the caller-facing result.
pub fn finalize(
    partial: &PartialAssignment,
    participants: &[Participant],
    target_trim: f64,
    swaps_applied: usize,
) -> LineupResult {
    let mut assignments = Vec::with_capacity(partial.layout().len());
    let mut unfilled = Vec::new();
    let mut notes = Vec::new();

    for (seat, slot) in partial.slots() {
        let (occupant, locked) = match slot {
            Slot::Locked(Some(candidate)) => (Occupant::Filled(candidate.id), true),
            Slot::Locked(None) => {
                unfilled.push(seat);
                (Occupant::Unfilled, true)
            }
            Slot::Assigned(candidate) => (Occupant::Filled(candidate.id), false),
            Slot::Free => {
                unfilled.push(seat);
                notes.push(ShortageNote {
                    seat,
                    required: seat.required_capability(),
                });
                (Occupant::Unfilled, false)
            }
        };
        assignments.push(SeatAssignment {
            seat,
            occupant,
            locked,
        });
    }

    let bench = participants
        .iter()
        .map(|participant| participant.id)
        .filter(|id| !partial.is_seated(*id))
        .collect();

    let trim = partial.trim();
    let balance = BalanceSummary {
        left_kg: partial.side_weight(Side::Left),
        right_kg: partial.side_weight(Side::Right),
        front_kg: partial.front_weight(),
        back_kg: partial.back_weight(),
        trim_kg: trim,
        target_trim_kg: target_trim,
        trim_deviation_kg: (trim - target_trim).abs(),
        swaps_applied,
    };

    LineupResult {
        rows: partial.layout().rows(),
        assignments,
        unfilled,
        notes,
        bench,
        balance,
    }
}
