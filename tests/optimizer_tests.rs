use std::collections::HashSet;

use tiller::boat::{Capability, CapabilitySet, Participant, ParticipantId, Seat, SeatKey, SeatKind, Weight};
use tiller::optimizer::{
    optimize_lineup, LineupError, LineupOptions, LineupRequest, LineupResult, LockedSeat,
    LockedSeatIssue, Occupant,
};

const BOTH: &[Capability] = &[Capability::Left, Capability::Right];

fn participant(id: u64, kg: f64, caps: &[Capability]) -> Participant {
    Participant::new(id, Weight::new(kg).expect("test weights are positive"), CapabilitySet::of(caps))
}

fn lock(kind: SeatKind, row: Option<usize>, id: Option<u64>) -> LockedSeat {
    LockedSeat {
        seat: SeatKey { kind, row },
        participant: id.map(ParticipantId),
    }
}

fn solve(request: &LineupRequest) -> LineupResult {
    optimize_lineup(request, &LineupOptions::default()).expect("request should be valid")
}

fn id_at(result: &LineupResult, seat: Seat) -> Option<u64> {
    result.participant_at(seat).map(|id| id.0)
}

#[test]
fn single_row_with_one_specialist_per_seat_fills_every_seat() {
    let request = LineupRequest {
        rows: Some(1),
        participants: vec![
            participant(1, 70.0, &[Capability::Left]),
            participant(2, 90.0, &[Capability::Right]),
            participant(3, 60.0, &[Capability::Drum]),
            participant(4, 65.0, &[Capability::Steer]),
        ],
        ..LineupRequest::default()
    };

    let result = solve(&request);

    assert_eq!(id_at(&result, Seat::left(0)), Some(1));
    assert_eq!(id_at(&result, Seat::right(0)), Some(2));
    assert_eq!(id_at(&result, Seat::Drum), Some(3));
    assert_eq!(id_at(&result, Seat::Steer), Some(4));
    assert!(result.unfilled.is_empty());
    assert!(result.notes.is_empty());
    assert!(result.bench.is_empty());
}

#[test]
fn two_dual_paddlers_split_heaviest_left() {
    let request = LineupRequest {
        rows: Some(1),
        participants: vec![participant(1, 80.0, BOTH), participant(2, 100.0, BOTH)],
        ..LineupRequest::default()
    };

    let result = solve(&request);

    assert_eq!(id_at(&result, Seat::left(0)), Some(2));
    assert_eq!(id_at(&result, Seat::right(0)), Some(1));
    assert_eq!(result.balance.left_kg, 100.0);
    assert_eq!(result.balance.right_kg, 80.0);
    assert!((result.balance.left_kg - result.balance.right_kg).abs() <= 20.0);
    assert_eq!(result.unfilled, vec![Seat::Drum, Seat::Steer]);
}

#[test]
fn locked_participant_keeps_seat_and_is_not_reused() {
    let request = LineupRequest {
        rows: Some(2),
        participants: vec![
            participant(5, 55.0, BOTH),
            participant(6, 95.0, BOTH),
            participant(7, 90.0, BOTH),
            participant(8, 85.0, BOTH),
        ],
        locked: vec![lock(SeatKind::LeftPaddle, Some(0), Some(5))],
        ..LineupRequest::default()
    };

    let result = solve(&request);

    assert_eq!(id_at(&result, Seat::left(0)), Some(5));
    let assignment = result
        .assignments
        .iter()
        .find(|assignment| assignment.seat == Seat::left(0))
        .expect("left seat of row 0 exists");
    assert!(assignment.locked);
    let uses_of_five = result.seated().filter(|(_, id)| id.0 == 5).count();
    assert_eq!(uses_of_five, 1);
}

#[test]
fn seat_pinned_to_nobody_stays_empty() {
    let request = LineupRequest {
        rows: Some(1),
        participants: vec![
            participant(1, 60.0, &[Capability::Drum]),
            participant(2, 70.0, BOTH),
        ],
        locked: vec![lock(SeatKind::Drum, None, None)],
        ..LineupRequest::default()
    };

    let result = solve(&request);

    assert_eq!(result.occupant(Seat::Drum), Some(Occupant::Unfilled));
    assert!(result.unfilled.contains(&Seat::Drum));
    assert!(result.notes.iter().all(|note| note.seat != Seat::Drum));
    assert!(result.bench.contains(&ParticipantId(1)));
}

#[test]
fn drum_prefers_the_most_specialized_candidate() {
    let request = LineupRequest {
        rows: Some(1),
        participants: vec![
            participant(1, 60.0, &[Capability::Drum, Capability::Left, Capability::Right]),
            participant(2, 58.0, &[Capability::Drum, Capability::Steer]),
            participant(3, 57.0, &[Capability::Drum]),
        ],
        ..LineupRequest::default()
    };

    let result = solve(&request);

    assert_eq!(id_at(&result, Seat::Drum), Some(3));
    assert_eq!(id_at(&result, Seat::Steer), Some(2));
    assert_eq!(id_at(&result, Seat::left(0)), Some(1));
}

#[test]
fn shortages_are_reported_not_raised() {
    let request = LineupRequest {
        rows: Some(2),
        participants: vec![participant(1, 70.0, &[Capability::Left])],
        ..LineupRequest::default()
    };

    let result = solve(&request);

    assert_eq!(result.assignments.len(), 6);
    assert_eq!(result.unfilled.len(), 5);
    let required: HashSet<Capability> = result.notes.iter().map(|note| note.required).collect();
    assert!(required.contains(&Capability::Drum));
    assert!(required.contains(&Capability::Steer));
    assert!(required.contains(&Capability::Right));
}

#[test]
fn trim_swap_reaches_the_target() {
    // After balancing: front row 100 | 90, back row 50 | 60, trim 80.
    let request = LineupRequest {
        rows: Some(2),
        participants: vec![
            participant(1, 100.0, BOTH),
            participant(2, 90.0, BOTH),
            participant(3, 60.0, BOTH),
            participant(4, 50.0, BOTH),
        ],
        target_trim: 20.0,
        ..LineupRequest::default()
    };

    let result = solve(&request);

    assert_eq!(result.balance.trim_kg, 20.0);
    assert_eq!(result.balance.swaps_applied, 1);
    assert_eq!(id_at(&result, Seat::right(0)), Some(3));
    assert_eq!(id_at(&result, Seat::right(1)), Some(2));
    assert_eq!(result.balance.left_kg, 150.0);
    assert_eq!(result.balance.right_kg, 150.0);
}

#[test]
fn identical_requests_give_identical_results() {
    let participants: Vec<Participant> = (1..=24)
        .map(|id| {
            let kg = 55.0 + ((id * 37) % 41) as f64;
            let caps: &[Capability] = match id % 6 {
                0 => &[Capability::Drum],
                1 => &[Capability::Steer, Capability::Left],
                2 => &[Capability::Left],
                3 => &[Capability::Right],
                _ => BOTH,
            };
            participant(id, kg, caps)
        })
        .collect();
    let request = LineupRequest {
        rows: Some(10),
        participants,
        locked: vec![lock(SeatKind::RightPaddle, Some(4), Some(9))],
        target_trim: 15.0,
        ..LineupRequest::default()
    };

    let first = serde_json::to_string(&solve(&request)).expect("result serializes");
    let second = serde_json::to_string(&solve(&request)).expect("result serializes");
    assert_eq!(first, second);
}

#[test]
fn duplicate_ids_reject_the_request() {
    let request = LineupRequest {
        rows: Some(1),
        participants: vec![participant(1, 70.0, BOTH), participant(1, 80.0, BOTH)],
        ..LineupRequest::default()
    };

    assert_eq!(
        optimize_lineup(&request, &LineupOptions::default()),
        Err(LineupError::DuplicateParticipant(ParticipantId(1)))
    );
}

#[test]
fn invalid_locks_reject_the_request() {
    let pool = vec![participant(1, 70.0, BOTH)];
    let cases = [
        (lock(SeatKind::LeftPaddle, Some(3), Some(1)), LockedSeatIssue::NotInLayout),
        (lock(SeatKind::Drum, Some(0), Some(1)), LockedSeatIssue::NotInLayout),
        (
            lock(SeatKind::RightPaddle, Some(0), Some(42)),
            LockedSeatIssue::UnknownParticipant(ParticipantId(42)),
        ),
    ];

    for (locked, expected) in cases {
        let request = LineupRequest {
            rows: Some(2),
            participants: pool.clone(),
            locked: vec![locked],
            ..LineupRequest::default()
        };
        match optimize_lineup(&request, &LineupOptions::default()) {
            Err(LineupError::InvalidLockedSeat { reason, .. }) => assert_eq!(reason, expected),
            other => panic!("expected invalid lock, got {other:?}"),
        }
    }
}

#[test]
fn request_json_accepts_camel_case_aliases() {
    let raw = r#"{
        "rows": 1,
        "participantPool": [
            {"id": 1, "weight": 70, "caps": ["left"]},
            {"id": 2, "weight": 75, "capabilities": ["right"], "isSubstitute": true}
        ],
        "lockedAssignments": [{"seat": {"kind": "right_paddle", "row": 0}, "participant": 2}],
        "targetTrim": 0
    }"#;

    let request: LineupRequest = serde_json::from_str(raw).expect("request parses");
    let result = solve(&request);

    assert_eq!(id_at(&result, Seat::left(0)), Some(1));
    assert_eq!(id_at(&result, Seat::right(0)), Some(2));
}

#[test]
fn non_positive_weight_fails_deserialization() {
    let raw = r#"{"rows": 1, "participants": [{"id": 1, "weight": 0, "capabilities": ["left"]}]}"#;
    assert!(serde_json::from_str::<LineupRequest>(raw).is_err());
}
