use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boat::Capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Left before right: iteration order doubles as the tie-break order.
    pub const BOTH: [Side; 2] = [Self::Left, Self::Right];

    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    pub const fn capability(self) -> Capability {
        match self {
            Self::Left => Capability::Left,
            Self::Right => Capability::Right,
        }
    }

    pub const fn seat_kind(self) -> SeatKind {
        match self {
            Self::Left => SeatKind::LeftPaddle,
            Self::Right => SeatKind::RightPaddle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    LeftPaddle,
    RightPaddle,
    Drum,
    Steer,
}

impl SeatKind {
    pub const fn required_capability(self) -> Capability {
        match self {
            Self::LeftPaddle => Capability::Left,
            Self::RightPaddle => Capability::Right,
            Self::Drum => Capability::Drum,
            Self::Steer => Capability::Steer,
        }
    }

    pub const fn is_paddle(self) -> bool {
        matches!(self, Self::LeftPaddle | Self::RightPaddle)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftPaddle => "left_paddle",
            Self::RightPaddle => "right_paddle",
            Self::Drum => "drum",
            Self::Steer => "steer",
        }
    }
}

/// A seat identity. Drum and steer are boat-level seats and carry no row.
///
/// The derived ordering is the physical bow-to-stern order: drum, then rows
/// front to back (left before right), then steer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "SeatKey")]
pub enum Seat {
    Drum,
    Paddle { row: usize, side: Side },
    Steer,
}

impl Seat {
    pub const fn left(row: usize) -> Self {
        Self::Paddle {
            row,
            side: Side::Left,
        }
    }

    pub const fn right(row: usize) -> Self {
        Self::Paddle {
            row,
            side: Side::Right,
        }
    }

    pub const fn kind(self) -> SeatKind {
        match self {
            Self::Drum => SeatKind::Drum,
            Self::Paddle { side, .. } => side.seat_kind(),
            Self::Steer => SeatKind::Steer,
        }
    }

    pub const fn row(self) -> Option<usize> {
        match self {
            Self::Paddle { row, .. } => Some(row),
            Self::Drum | Self::Steer => None,
        }
    }

    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Paddle { side, .. } => Some(side),
            Self::Drum | Self::Steer => None,
        }
    }

    pub const fn required_capability(self) -> Capability {
        self.kind().required_capability()
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drum => f.write_str("drum"),
            Self::Steer => f.write_str("steer"),
            Self::Paddle { row, side: Side::Left } => write!(f, "row {row} left"),
            Self::Paddle { row, side: Side::Right } => write!(f, "row {row} right"),
        }
    }
}

/// Wire form of a seat identity: `{"kind": "left_paddle", "row": 0}` or `{"kind": "drum"}`.
///
/// Kept separate from [Seat] so malformed identities survive parsing and can be
/// reported against the layout instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatKey {
    pub kind: SeatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl SeatKey {
    /// Structural resolution only; row bounds are checked by the layout.
    pub fn to_seat(self) -> Option<Seat> {
        match (self.kind, self.row) {
            (SeatKind::Drum, None) => Some(Seat::Drum),
            (SeatKind::Steer, None) => Some(Seat::Steer),
            (SeatKind::LeftPaddle, Some(row)) => Some(Seat::left(row)),
            (SeatKind::RightPaddle, Some(row)) => Some(Seat::right(row)),
            _ => None,
        }
    }
}

impl From<Seat> for SeatKey {
    fn from(seat: Seat) -> Self {
        Self {
            kind: seat.kind(),
            row: seat.row(),
        }
    }
}

impl fmt::Display for SeatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.as_str();
        match self.row {
            Some(row) => write!(f, "{kind}[{row}]"),
            None => f.write_str(kind),
        }
    }
}
