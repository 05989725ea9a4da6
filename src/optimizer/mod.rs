pub mod assigner;
pub mod balance;
pub mod candidates;
pub mod error;
pub mod locks;
pub mod partial;
pub mod trim;

use log::info;
use serde::{Deserialize, Serialize};

use crate::boat::{Capability, Participant, ParticipantId, Seat, SeatKey, SeatLayout, DEFAULT_ROWS};
use crate::optimizer::assigner::{fill_exclusive_seats, finalize};
use crate::optimizer::balance::balance_sides;
use crate::optimizer::candidates::CandidatePool;
use crate::optimizer::locks::{pin_participants, resolve_locks};
use crate::optimizer::partial::PartialAssignment;
use crate::optimizer::trim::refine_trim;

pub use error::{LineupError, LockedSeatIssue};

/// Default allowed gap between achieved and target trim, in kilograms.
pub const DEFAULT_TRIM_TOLERANCE_KG: f64 = 0.5;

/// Default upper bound on requested rows.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// A caller pin. `participant: None` keeps the seat deliberately empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockedSeat {
    pub seat: SeatKey,
    #[serde(default)]
    pub participant: Option<ParticipantId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineupRequest {
    /// When None, [LineupOptions::default_rows] is used.
    #[serde(default)]
    pub rows: Option<i64>,
    #[serde(default, alias = "participantPool", alias = "pool")]
    pub participants: Vec<Participant>,
    #[serde(default, alias = "lockedAssignments")]
    pub locked: Vec<LockedSeat>,
    /// Desired front-minus-back weight in kilograms; positive is bow-heavy.
    #[serde(default, alias = "targetTrim")]
    pub target_trim: f64,
    /// When true, substitutes are only seated if a lock names them.
    #[serde(default, alias = "excludeSubstitutes")]
    pub exclude_substitutes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineupOptions {
    pub default_rows: usize,
    /// Requests naming more rows are rejected with [LineupError::InvalidLayout].
    pub max_rows: usize,
    pub trim_tolerance_kg: f64,
}

impl Default for LineupOptions {
    fn default() -> Self {
        Self {
            default_rows: DEFAULT_ROWS,
            max_rows: DEFAULT_MAX_ROWS,
            trim_tolerance_kg: DEFAULT_TRIM_TOLERANCE_KG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "participant", rename_all = "snake_case")]
pub enum Occupant {
    Filled(ParticipantId),
    Unfilled,
}

impl Occupant {
    pub fn participant(self) -> Option<ParticipantId> {
        match self {
            Self::Filled(id) => Some(id),
            Self::Unfilled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatAssignment {
    pub seat: Seat,
    pub occupant: Occupant,
    /// True when the occupant came from a caller pin.
    pub locked: bool,
}

/// A free seat left unfilled because no unconsumed candidate had the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShortageNote {
    pub seat: Seat,
    pub required: Capability,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub left_kg: f64,
    pub right_kg: f64,
    pub front_kg: f64,
    pub back_kg: f64,
    pub trim_kg: f64,
    pub target_trim_kg: f64,
    pub trim_deviation_kg: f64,
    pub swaps_applied: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupResult {
    pub rows: usize,
    /// Every seat of the layout, bow to stern.
    pub assignments: Vec<SeatAssignment>,
    /// Seats mapped to [Occupant::Unfilled], pinned-empty seats included.
    pub unfilled: Vec<Seat>,
    pub notes: Vec<ShortageNote>,
    /// Pool participants left without a seat, in pool order.
    pub bench: Vec<ParticipantId>,
    pub balance: BalanceSummary,
}

impl LineupResult {
    pub fn occupant(&self, seat: Seat) -> Option<Occupant> {
        self.assignments
            .iter()
            .find(|assignment| assignment.seat == seat)
            .map(|assignment| assignment.occupant)
    }

    pub fn participant_at(&self, seat: Seat) -> Option<ParticipantId> {
        self.occupant(seat).and_then(Occupant::participant)
    }

    pub fn seated(&self) -> impl Iterator<Item = (Seat, ParticipantId)> + '_ {
        self.assignments
            .iter()
            .filter_map(|assignment| assignment.occupant.participant().map(|id| (assignment.seat, id)))
    }
}

/// Fill every free seat of the requested layout.
///
/// Validation runs first and rejects the whole request; after that the
/// pipeline is drum/steer, side balancing, trim refinement, finalize.
/// Identical requests always produce identical results.
pub fn optimize_lineup(
    request: &LineupRequest,
    options: &LineupOptions,
) -> Result<LineupResult, LineupError> {
    let layout = build_layout(request.rows, options)?;
    if !request.target_trim.is_finite() {
        return Err(LineupError::InvalidTrim {
            value: request.target_trim,
        });
    }
    let pins = resolve_locks(&layout, &request.locked)?;
    let pool = CandidatePool::resolve(
        &request.participants,
        pins.values().flatten().copied(),
        request.exclude_substitutes,
    )?;
    let pinned = pin_participants(&pins, &request.participants)?;

    let partial = PartialAssignment::new(layout, pinned);
    let partial = fill_exclusive_seats(partial, &pool);
    let partial = balance_sides(partial, &pool);
    let outcome = refine_trim(partial, request.target_trim, options.trim_tolerance_kg);
    let result = finalize(
        &outcome.partial,
        &request.participants,
        request.target_trim,
        outcome.swaps_applied,
    );

    info!(
        "lineup solved: rows={}, pool={}, locked={}, unfilled={}, trim={:.1} kg (target {:.1})",
        result.rows,
        request.participants.len(),
        pins.len(),
        result.unfilled.len(),
        result.balance.trim_kg,
        request.target_trim
    );
    Ok(result)
}

fn build_layout(rows: Option<i64>, options: &LineupOptions) -> Result<SeatLayout, LineupError> {
    match rows {
        None => SeatLayout::build(options.default_rows),
        Some(requested) => {
            let rows = usize::try_from(requested)
                .ok()
                .filter(|rows| (1..=options.max_rows).contains(rows))
                .ok_or(LineupError::InvalidLayout { rows: requested })?;
            SeatLayout::build(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boat::{CapabilitySet, SeatKind, Weight};

    fn participant(id: u64, kg: f64, caps: &[Capability]) -> Participant {
        Participant::new(id, Weight::new(kg).unwrap(), CapabilitySet::of(caps))
    }

    #[test]
    fn missing_rows_falls_back_to_default() {
        let result = optimize_lineup(&LineupRequest::default(), &LineupOptions::default()).unwrap();
        assert_eq!(result.rows, DEFAULT_ROWS);
        assert_eq!(result.assignments.len(), DEFAULT_ROWS * 2 + 2);
        assert_eq!(result.unfilled.len(), DEFAULT_ROWS * 2 + 2);
    }

    #[test]
    fn non_positive_rows_are_rejected() {
        for rows in [0, -3] {
            let request = LineupRequest {
                rows: Some(rows),
                ..LineupRequest::default()
            };
            assert_eq!(
                optimize_lineup(&request, &LineupOptions::default()),
                Err(LineupError::InvalidLayout { rows })
            );
        }
    }

    #[test]
    fn rows_above_the_limit_are_rejected() {
        let options = LineupOptions {
            max_rows: 12,
            ..LineupOptions::default()
        };
        for rows in [13, i64::MAX] {
            let request = LineupRequest {
                rows: Some(rows),
                ..LineupRequest::default()
            };
            assert_eq!(
                optimize_lineup(&request, &options),
                Err(LineupError::InvalidLayout { rows })
            );
        }

        let huge = LineupRequest {
            rows: Some(i64::MAX),
            ..LineupRequest::default()
        };
        assert_eq!(
            optimize_lineup(&huge, &LineupOptions { max_rows: usize::MAX, ..LineupOptions::default() }),
            Err(LineupError::InvalidLayout { rows: i64::MAX })
        );

        let at_limit = LineupRequest {
            rows: Some(12),
            ..LineupRequest::default()
        };
        assert_eq!(optimize_lineup(&at_limit, &options).map(|result| result.rows), Ok(12));
    }

    #[test]
    fn non_finite_trim_is_rejected() {
        let request = LineupRequest {
            rows: Some(2),
            target_trim: f64::NAN,
            ..LineupRequest::default()
        };
        assert!(matches!(
            optimize_lineup(&request, &LineupOptions::default()),
            Err(LineupError::InvalidTrim { .. })
        ));
    }

    #[test]
    fn excluded_substitute_can_still_be_pinned() {
        let request = LineupRequest {
            rows: Some(1),
            participants: vec![
                participant(1, 70.0, &[Capability::Left]).as_substitute(),
                participant(2, 75.0, &[Capability::Right]).as_substitute(),
            ],
            locked: vec![LockedSeat {
                seat: SeatKey { kind: SeatKind::LeftPaddle, row: Some(0) },
                participant: Some(ParticipantId(1)),
            }],
            exclude_substitutes: true,
            ..LineupRequest::default()
        };

        let result = optimize_lineup(&request, &LineupOptions::default()).unwrap();

        assert_eq!(result.participant_at(Seat::left(0)), Some(ParticipantId(1)));
        assert_eq!(result.occupant(Seat::right(0)), Some(Occupant::Unfilled));
        assert_eq!(result.bench, vec![ParticipantId(2)]);
    }

    #[test]
    fn occupant_serializes_with_explicit_status() {
        let filled = serde_json::to_value(Occupant::Filled(ParticipantId(3))).unwrap();
        let unfilled = serde_json::to_value(Occupant::Unfilled).unwrap();
        assert_eq!(filled, serde_json::json!({"status": "filled", "participant": 3}));
        assert_eq!(unfilled, serde_json::json!({"status": "unfilled"}));
    }
}
