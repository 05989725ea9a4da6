use std::collections::{BTreeSet, HashMap, HashSet};

use proptest::prelude::*;
use tiller::boat::{Capability, CapabilitySet, Participant, ParticipantId, SeatKey, SeatLayout, Weight};
use tiller::optimizer::{optimize_lineup, LineupOptions, LineupRequest, LockedSeat};

fn capabilities_from_mask(mask: u8) -> CapabilitySet {
    Capability::ALL
        .into_iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, capability)| capability)
        .collect()
}

fn build_request(
    rows: usize,
    pool: &[(f64, u8, bool)],
    lock_picks: &[(usize, Option<usize>)],
    target_trim: f64,
    exclude_substitutes: bool,
) -> LineupRequest {
    let participants: Vec<Participant> = pool
        .iter()
        .enumerate()
        .map(|(index, (kg, mask, substitute))| {
            let participant = Participant::new(
                index as u64 + 1,
                Weight::new(*kg).expect("generated weights are positive"),
                capabilities_from_mask(*mask),
            );
            if *substitute {
                participant.as_substitute()
            } else {
                participant
            }
        })
        .collect();

    let layout = SeatLayout::build(rows).expect("generated rows are positive");
    let mut used_seats = HashSet::new();
    let mut used_ids = HashSet::new();
    let mut locked = Vec::new();
    for (seat_pick, participant_pick) in lock_picks {
        let seat = layout.seats()[seat_pick % layout.len()];
        let participant = match participant_pick {
            Some(pick) if !participants.is_empty() => Some(participants[pick % participants.len()].id),
            _ => None,
        };
        if !used_seats.insert(seat) {
            continue;
        }
        if let Some(id) = participant {
            if !used_ids.insert(id) {
                continue;
            }
        }
        locked.push(LockedSeat {
            seat: SeatKey::from(seat),
            participant,
        });
    }

    LineupRequest {
        rows: Some(rows as i64),
        participants,
        locked,
        target_trim,
        exclude_substitutes,
    }
}

fn pool_strategy(max: usize) -> impl Strategy<Value = Vec<(f64, u8, bool)>> {
    prop::collection::vec((40.0f64..120.0, 0u8..16, prop::bool::weighted(0.2)), 0..max)
}

proptest! {
    /// Every valid request yields a total, consistent seat map.
    #[test]
    fn prop_result_respects_locks_capabilities_and_uniqueness(
        rows in 1usize..7,
        pool in pool_strategy(20),
        lock_picks in prop::collection::vec((0usize..64, prop::option::of(0usize..64)), 0..4),
        target_trim in -60.0f64..60.0,
        exclude_substitutes in any::<bool>(),
    ) {
        let request = build_request(rows, &pool, &lock_picks, target_trim, exclude_substitutes);
        let options = LineupOptions::default();
        let result = optimize_lineup(&request, &options).expect("generated requests are valid");

        prop_assert_eq!(result.assignments.len(), rows * 2 + 2);
        let distinct_seats: BTreeSet<_> = result.assignments.iter().map(|a| a.seat).collect();
        prop_assert_eq!(distinct_seats.len(), result.assignments.len());

        let mut seen = HashSet::new();
        for (_, id) in result.seated() {
            prop_assert!(seen.insert(id), "participant {} seated twice", id);
        }

        let by_id: HashMap<ParticipantId, &Participant> =
            request.participants.iter().map(|p| (p.id, p)).collect();
        let locked_ids: HashSet<ParticipantId> =
            request.locked.iter().filter_map(|lock| lock.participant).collect();
        for lock in &request.locked {
            let seat = lock.seat.to_seat().expect("locks come from the layout");
            prop_assert_eq!(result.participant_at(seat), lock.participant);
        }
        for assignment in result.assignments.iter().filter(|a| !a.locked) {
            if let Some(id) = assignment.occupant.participant() {
                let participant = by_id[&id];
                prop_assert!(participant.can(assignment.seat.required_capability()));
                prop_assert!(!locked_ids.contains(&id));
                if exclude_substitutes {
                    prop_assert!(!participant.is_substitute);
                }
            }
        }

        let seated_or_benched = seen.len() + result.bench.len();
        prop_assert_eq!(seated_or_benched, request.participants.len());
        prop_assert!(
            (result.balance.trim_deviation_kg - (result.balance.trim_kg - target_trim).abs()).abs() < 1e-9
        );

        let again = optimize_lineup(&request, &options).expect("generated requests are valid");
        prop_assert_eq!(again, result);
    }

    /// With every participant able to take every seat and no more paddlers than
    /// seats, the side totals differ by at most the heaviest participant.
    #[test]
    fn prop_side_difference_bounded_by_heaviest(
        rows in 1usize..9,
        weights in prop::collection::vec(40.0f64..120.0, 0..20),
        target_trim in -40.0f64..40.0,
    ) {
        let count = weights.len().min(rows * 2 + 2);
        let pool: Vec<(f64, u8, bool)> = weights[..count].iter().map(|kg| (*kg, 0b1111, false)).collect();
        let request = build_request(rows, &pool, &[], target_trim, false);

        let result = optimize_lineup(&request, &LineupOptions::default()).expect("valid request");

        let heaviest = weights[..count].iter().copied().fold(0.0, f64::max);
        let difference = (result.balance.left_kg - result.balance.right_kg).abs();
        prop_assert!(difference <= heaviest + 1e-9, "difference {} exceeds {}", difference, heaviest);
        prop_assert!(result.unfilled.len() + count >= rows * 2 + 2);
    }
}
