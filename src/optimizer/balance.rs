//! Phase B: left/right partition of the paddlers.

use log::debug;

use crate::boat::Side;
use crate::optimizer::candidates::CandidatePool;
use crate::optimizer::partial::PartialAssignment;

/// Greedy largest-first two-way partition over every free paddle seat.
///
/// Paddlers are taken heaviest first (input order on equal weight) and placed on
/// the side with the lower running total among the sides they can paddle that
/// still have a free seat; equal totals go left. Locked paddlers count toward
/// the running totals. Paddlers with no open capable side stay unassigned.
pub fn balance_sides(mut partial: PartialAssignment, pool: &CandidatePool) -> PartialAssignment {
    let mut open = Side::BOTH.map(|side| partial.free_paddle_seats(side).into_iter());
    let mut remaining = Side::BOTH.map(|side| partial.free_paddle_seats(side).len());
    let mut totals = Side::BOTH.map(|side| partial.side_weight(side));

    let mut paddlers: Vec<_> = pool
        .paddlers
        .iter()
        .filter(|candidate| !partial.is_seated(candidate.id))
        .copied()
        .collect();
    paddlers.sort_by(|a, b| b.weight.kg().total_cmp(&a.weight.kg()));

    for candidate in paddlers {
        let side = Side::BOTH
            .into_iter()
            .filter(|side| {
                candidate.capabilities.contains(side.capability()) && remaining[side.index()] > 0
            })
            .min_by(|a, b| totals[a.index()].total_cmp(&totals[b.index()]));
        let Some(side) = side else {
            debug!("{}: no open seat on a side they can paddle", candidate.id);
            continue;
        };
        let Some(seat) = open[side.index()].next() else {
            continue;
        };
        partial.assign(seat, candidate);
        remaining[side.index()] -= 1;
        totals[side.index()] += candidate.weight.kg();
    }

    debug!(
        "side totals after balancing: left {:.1} kg, right {:.1} kg",
        totals[Side::Left.index()],
        totals[Side::Right.index()]
    );
    partial
}
