use crate::boat::{Seat, SeatKey, Side};
use crate::optimizer::{LineupError, LockedSeatIssue};

/// Rows used when a request does not name a count.
pub const DEFAULT_ROWS: usize = 10;

/// Hard ceiling on the row count any layout can have.
pub const MAX_LAYOUT_ROWS: usize = 1_000;

/// Ordered seat topology for a boat with `rows` paddling rows.
///
/// Seats are listed bow to stern: drum, each row's left and right paddle seat, steer.
/// Rows `0..rows / 2` form the front half; the remaining rows form the back half,
/// so an odd row count puts the middle row at the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLayout {
    rows: usize,
    seats: Vec<Seat>,
}

impl SeatLayout {
    /// Fails with [LineupError::InvalidLayout] for zero rows or more than
    /// [MAX_LAYOUT_ROWS].
    pub fn build(rows: usize) -> Result<Self, LineupError> {
        let invalid = || LineupError::InvalidLayout {
            rows: i64::try_from(rows).unwrap_or(i64::MAX),
        };
        if rows == 0 || rows > MAX_LAYOUT_ROWS {
            return Err(invalid());
        }
        let capacity = rows
            .checked_mul(2)
            .and_then(|paddle_seats| paddle_seats.checked_add(2))
            .ok_or_else(invalid)?;

        let mut seats = Vec::with_capacity(capacity);
        seats.push(Seat::Drum);
        for row in 0..rows {
            seats.push(Seat::left(row));
            seats.push(Seat::right(row));
        }
        seats.push(Seat::Steer);

        Ok(Self { rows, seats })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, seat: Seat) -> bool {
        match seat {
            Seat::Paddle { row, .. } => row < self.rows,
            Seat::Drum | Seat::Steer => true,
        }
    }

    pub fn resolve(&self, key: SeatKey) -> Result<Seat, LockedSeatIssue> {
        key.to_seat()
            .filter(|seat| self.contains(*seat))
            .ok_or(LockedSeatIssue::NotInLayout)
    }

    pub fn is_front_row(&self, row: usize) -> bool {
        row < self.rows / 2
    }

    pub fn paddle_seats(&self, side: Side) -> impl Iterator<Item = Seat> + '_ {
        self.seats
            .iter()
            .copied()
            .filter(move |seat| seat.side() == Some(side))
    }
}
