use std::collections::{BTreeMap, HashSet};

use crate::boat::{Participant, ParticipantId, Seat, SeatLayout};
use crate::optimizer::candidates::Candidate;
use crate::optimizer::{LineupError, LockedSeat, LockedSeatIssue};

/// Check every pin against the layout and return them keyed by seat.
///
/// A seat may be pinned once and a participant may occupy one pinned seat.
pub fn resolve_locks(
    layout: &SeatLayout,
    locked: &[LockedSeat],
) -> Result<BTreeMap<Seat, Option<ParticipantId>>, LineupError> {
    let mut pins = BTreeMap::new();
    let mut pinned_ids = HashSet::new();

    for lock in locked {
        let reject = |reason: LockedSeatIssue| LineupError::InvalidLockedSeat {
            seat: lock.seat,
            reason,
        };
        let seat = layout.resolve(lock.seat).map_err(reject)?;
        if pins.contains_key(&seat) {
            return Err(reject(LockedSeatIssue::SeatPinnedTwice));
        }
        if let Some(id) = lock.participant {
            if !pinned_ids.insert(id) {
                return Err(reject(LockedSeatIssue::ParticipantPinnedTwice(id)));
            }
        }
        pins.insert(seat, lock.participant);
    }

    Ok(pins)
}

/// Attach pool data to each pinned participant.
pub fn pin_participants(
    pins: &BTreeMap<Seat, Option<ParticipantId>>,
    participants: &[Participant],
) -> Result<BTreeMap<Seat, Option<Candidate>>, LineupError> {
    pins.iter()
        .map(|(seat, pinned)| {
            let occupant = match pinned {
                None => None,
                Some(id) => {
                    let participant = participants
                        .iter()
                        .find(|participant| participant.id == *id)
                        .ok_or_else(|| LineupError::InvalidLockedSeat {
                            seat: (*seat).into(),
                            reason: LockedSeatIssue::UnknownParticipant(*id),
                        })?;
                    Some(Candidate::from(participant))
                }
            };
            Ok((*seat, occupant))
        })
        .collect()
}
