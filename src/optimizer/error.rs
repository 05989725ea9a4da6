use thiserror::Error;

use crate::boat::{ParticipantId, SeatKey};

/// Input problems that reject a whole lineup request before any seat is filled.
///
/// Seats that cannot be filled are not errors; they come back as unfilled
/// entries in [crate::optimizer::LineupResult].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineupError {
    #[error("row count must be a positive integer within the row limit, got {rows}")]
    InvalidLayout { rows: i64 },
    #[error("participant {0} appears more than once in the pool")]
    DuplicateParticipant(ParticipantId),
    #[error("locked seat {seat} is invalid: {reason}")]
    InvalidLockedSeat {
        seat: SeatKey,
        reason: LockedSeatIssue,
    },
    #[error("weight must be a positive number of kilograms, got {value}")]
    InvalidWeight { value: f64 },
    #[error("target trim must be a finite number of kilograms, got {value}")]
    InvalidTrim { value: f64 },
}

impl LineupError {
    /// Request field the error is reported against.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidLayout { .. } => "rows",
            Self::DuplicateParticipant(_) | Self::InvalidWeight { .. } => "participants",
            Self::InvalidLockedSeat { .. } => "locked",
            Self::InvalidTrim { .. } => "target_trim",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LockedSeatIssue {
    #[error("seat is not part of the layout")]
    NotInLayout,
    #[error("participant {0} is not in the pool")]
    UnknownParticipant(ParticipantId),
    #[error("seat is pinned more than once")]
    SeatPinnedTwice,
    #[error("participant {0} is pinned to more than one seat")]
    ParticipantPinnedTwice(ParticipantId),
}
