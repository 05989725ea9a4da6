use std::collections::{BTreeMap, BTreeSet};

use crate::boat::{ParticipantId, Seat, SeatLayout, Side};
use crate::optimizer::candidates::Candidate;

/// State of one seat while the assigner runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Free,
    /// Pinned by the caller; `None` means pinned empty.
    Locked(Option<Candidate>),
    Assigned(Candidate),
}

impl Slot {
    pub fn occupant(&self) -> Option<&Candidate> {
        match self {
            Self::Locked(occupant) => occupant.as_ref(),
            Self::Assigned(candidate) => Some(candidate),
            Self::Free => None,
        }
    }
}

/// Intermediate seat map handed from phase to phase.
///
/// Every seat of the layout has exactly one slot. Participants placed with
/// [PartialAssignment::assign] are tracked so later phases never reuse them.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialAssignment {
    layout: SeatLayout,
    slots: BTreeMap<Seat, Slot>,
    seated: BTreeSet<ParticipantId>,
}

impl PartialAssignment {
    pub fn new(layout: SeatLayout, pinned: BTreeMap<Seat, Option<Candidate>>) -> Self {
        let mut slots: BTreeMap<Seat, Slot> = layout
            .seats()
            .iter()
            .map(|seat| (*seat, Slot::Free))
            .collect();
        let mut seated = BTreeSet::new();
        for (seat, occupant) in pinned {
            if let Some(candidate) = occupant {
                seated.insert(candidate.id);
            }
            slots.insert(seat, Slot::Locked(occupant));
        }
        Self {
            layout,
            slots,
            seated,
        }
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    pub fn slot(&self, seat: Seat) -> Slot {
        self.slots.get(&seat).copied().unwrap_or(Slot::Free)
    }

    pub fn slots(&self) -> impl Iterator<Item = (Seat, Slot)> + '_ {
        self.slots.iter().map(|(seat, slot)| (*seat, *slot))
    }

    pub fn is_free(&self, seat: Seat) -> bool {
        matches!(self.slot(seat), Slot::Free)
    }

    pub fn is_seated(&self, id: ParticipantId) -> bool {
        self.seated.contains(&id)
    }

    /// Place `candidate` in a free seat. Occupied seats and already-seated
    /// candidates are left untouched; returns whether the placement happened.
    pub fn assign(&mut self, seat: Seat, candidate: Candidate) -> bool {
        if !self.is_free(seat) || self.seated.contains(&candidate.id) {
            return false;
        }
        self.slots.insert(seat, Slot::Assigned(candidate));
        self.seated.insert(candidate.id);
        true
    }

    /// Exchange the occupants of two seats filled by the assigner.
    pub fn swap(&mut self, a: Seat, b: Seat) -> bool {
        match (self.slot(a), self.slot(b)) {
            (Slot::Assigned(first), Slot::Assigned(second)) => {
                self.slots.insert(a, Slot::Assigned(second));
                self.slots.insert(b, Slot::Assigned(first));
                true
            }
            _ => false,
        }
    }

    /// Free paddle seats of one side, alternating front half and back half so
    /// heavy early picks do not all land at the bow.
    pub fn free_paddle_seats(&self, side: Side) -> Vec<Seat> {
        let (front, back): (Vec<Seat>, Vec<Seat>) = self
            .layout
            .paddle_seats(side)
            .filter(|seat| self.is_free(*seat))
            .partition(|seat| seat.row().is_some_and(|row| self.layout.is_front_row(row)));

        let mut ordered = Vec::with_capacity(front.len() + back.len());
        let mut front = front.into_iter();
        let mut back = back.into_iter();
        loop {
            match (front.next(), back.next()) {
                (None, None) => break,
                (f, b) => ordered.extend(f.into_iter().chain(b)),
            }
        }
        ordered
    }

    /// Seats on `side` whose occupant the assigner placed, split into (front, back).
    pub fn movable_paddlers(&self, side: Side) -> (Vec<(Seat, Candidate)>, Vec<(Seat, Candidate)>) {
        self.layout
            .paddle_seats(side)
            .filter_map(|seat| match self.slot(seat) {
                Slot::Assigned(candidate) => Some((seat, candidate)),
                _ => None,
            })
            .partition(|(seat, _)| seat.row().is_some_and(|row| self.layout.is_front_row(row)))
    }

    pub fn side_weight(&self, side: Side) -> f64 {
        self.paddle_weight(|seat| seat.side() == Some(side))
    }

    pub fn front_weight(&self) -> f64 {
        self.paddle_weight(|seat| seat.row().is_some_and(|row| self.layout.is_front_row(row)))
    }

    pub fn back_weight(&self) -> f64 {
        self.paddle_weight(|seat| seat.row().is_some_and(|row| !self.layout.is_front_row(row)))
    }

    /// Front-minus-back weight over every occupied paddle seat.
    pub fn trim(&self) -> f64 {
        self.front_weight() - self.back_weight()
    }

    fn paddle_weight<F>(&self, include: F) -> f64
    where
        F: Fn(Seat) -> bool,
    {
        self.slots
            .iter()
            .filter(|(seat, _)| include(**seat))
            .filter_map(|(_, slot)| slot.occupant())
            .map(|candidate| candidate.weight.kg())
            .sum()
    }
}
