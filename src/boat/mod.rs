//! Closed domain vocabulary for a crewed boat: who can sit where, and which seats exist.

pub mod layout;
pub mod participant;
pub mod seat;

pub use layout::{SeatLayout, DEFAULT_ROWS, MAX_LAYOUT_ROWS};
pub use participant::{Capability, CapabilitySet, Participant, ParticipantId, Weight};
pub use seat::{Seat, SeatKey, SeatKind, Side};
