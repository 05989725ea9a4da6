//! Phase C: front/back trim refinement by same-side swaps.

use log::debug;

use crate::boat::{Seat, Side};
use crate::optimizer::partial::PartialAssignment;

/// Smallest deviation decrease that counts as an improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct TrimOutcome {
    pub partial: PartialAssignment,
    pub swaps_applied: usize,
}

/// Local search on top of the side partition.
///
/// Each pass applies the single front/back swap (left with left or right with
/// right, assigner-placed occupants only) that most reduces
/// `|trim - target_trim|`. Stops once within `tolerance`, when no swap improves,
/// or after as many passes as the layout has seats. Same-side swaps leave the
/// left and right totals unchanged.
pub fn refine_trim(mut partial: PartialAssignment, target_trim: f64, tolerance: f64) -> TrimOutcome {
    let max_passes = partial.layout().len();
    let mut swaps_applied = 0;

    while swaps_applied < max_passes {
        let deviation = (partial.trim() - target_trim).abs();
        if deviation <= tolerance {
            break;
        }
        let Some((front, back)) = best_swap(&partial, target_trim, deviation) else {
            debug!("trim: no improving swap at deviation {deviation:.2} kg");
            break;
        };
        debug!("trim: swapping {front} with {back}");
        partial.swap(front, back);
        swaps_applied += 1;
    }

    TrimOutcome {
        partial,
        swaps_applied,
    }
}

fn best_swap(partial: &PartialAssignment, target_trim: f64, current: f64) -> Option<(Seat, Seat)> {
    let trim = partial.trim();
    let mut best: Option<(f64, Seat, Seat)> = None;

    for side in Side::BOTH {
        let (front, back) = partial.movable_paddlers(side);
        for (front_seat, front_occupant) in &front {
            for (back_seat, back_occupant) in &back {
                let moved = front_occupant.weight.kg() - back_occupant.weight.kg();
                let deviation = (trim - 2.0 * moved - target_trim).abs();
                let to_beat = best.map_or(current, |(best_deviation, _, _)| best_deviation);
                if deviation + IMPROVEMENT_EPSILON < to_beat {
                    best = Some((deviation, *front_seat, *back_seat));
                }
            }
        }
    }

    best.map(|(_, front, back)| (front, back))
}
