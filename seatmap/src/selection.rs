//! Selection state machine
//!
//! Holds the ordered list of chosen seats (at most [`MAX_SELECTION`]) and the
//! single focused seat. All transitions are synchronous and total: inputs that
//! do not apply leave the state untouched.
//!
//! Invariants:
//!
//! - no seat id appears twice in the selection
//! - the selection never exceeds [`MAX_SELECTION`] seats
//! - every seat added through [`SelectionState::toggle`] was available at the
//!   time it was added
//! - order is insertion order; removals keep the relative order of the rest

use crate::pricing::{PriceTable, Subtotal};
use crate::venue::{Seat, SeatId, SeatRef};
use serde::{Deserialize, Serialize};

/// Maximum number of seats that can be selected at once
pub const MAX_SELECTION: usize = 8;

/// A seat enriched with where it sits
///
/// Serialized as the seat's own fields plus `sectionId`, `sectionLabel` and
/// `rowIndex`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSeat {
    /// The seat as it appeared in the catalog
    #[serde(flatten)]
    pub seat: Seat,
    /// Enclosing section id
    pub section_id: String,
    /// Enclosing section label
    pub section_label: String,
    /// Enclosing row index
    pub row_index: i32,
}

impl SelectedSeat {
    /// The seat id
    #[must_use]
    pub const fn id(&self) -> &SeatId {
        &self.seat.id
    }
}

impl From<SeatRef<'_>> for SelectedSeat {
    fn from(found: SeatRef<'_>) -> Self {
        Self {
            seat: found.seat.clone(),
            section_id: found.section.id.clone(),
            section_label: found.section.label.clone(),
            row_index: found.row.index,
        }
    }
}

/// What a toggle did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Seat was appended to the selection
    Selected,
    /// Seat was removed from the selection
    Deselected,
    /// Selection is full; the seat was focused but not added
    AtCapacity,
    /// Seat is not available; nothing changed
    Unavailable,
}

impl ToggleOutcome {
    /// Whether the selection list changed
    #[must_use]
    pub const fn changed_selection(self) -> bool {
        matches!(self, ToggleOutcome::Selected | ToggleOutcome::Deselected)
    }
}

/// Chosen seats plus the focused seat
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    seats: Vec<SelectedSeat>,
    focused: Option<SelectedSeat>,
}

impl SelectionState {
    /// Empty selection, nothing focused
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seats: Vec::new(),
            focused: None,
        }
    }

    /// Rebuild a selection from persisted seats
    ///
    /// Duplicates are dropped (first occurrence wins) and anything past
    /// [`MAX_SELECTION`] is discarded. Focus starts empty.
    #[must_use]
    pub fn restore(seats: Vec<SelectedSeat>) -> Self {
        let mut restored = Self::new();
        let offered = seats.len();
        for seat in seats {
            if restored.seats.len() == MAX_SELECTION {
                break;
            }
            if !restored.contains(seat.id()) {
                restored.seats.push(seat);
            }
        }
        if restored.seats.len() != offered {
            tracing::warn!(
                offered,
                kept = restored.seats.len(),
                "Persisted selection trimmed to unique seats within capacity"
            );
        }
        restored
    }

    /// Selected seats in insertion order
    #[must_use]
    pub fn seats(&self) -> &[SelectedSeat] {
        &self.seats
    }

    /// The focused seat, if any
    #[must_use]
    pub const fn focused(&self) -> Option<&SelectedSeat> {
        self.focused.as_ref()
    }

    /// Whether `seat_id` is focused
    #[must_use]
    pub fn is_focused(&self, seat_id: &SeatId) -> bool {
        self.focused.as_ref().is_some_and(|f| f.id() == seat_id)
    }

    /// Whether `seat_id` is selected
    #[must_use]
    pub fn contains(&self, seat_id: &SeatId) -> bool {
        self.seats.iter().any(|s| s.id() == seat_id)
    }

    /// Number of selected seats
    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Whether the selection is at [`MAX_SELECTION`]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.seats.len() >= MAX_SELECTION
    }

    /// Toggle a catalog seat in or out of the selection
    ///
    /// Unavailable seats are ignored entirely. Otherwise the seat becomes the
    /// focus, and is removed if selected or appended if there is room.
    pub fn toggle(&mut self, seat: SelectedSeat) -> ToggleOutcome {
        if !seat.seat.status.is_available() {
            return ToggleOutcome::Unavailable;
        }

        let position = self.seats.iter().position(|s| s.id() == seat.id());
        let outcome = match position {
            Some(index) => {
                self.seats.remove(index);
                ToggleOutcome::Deselected
            },
            None if self.is_full() => ToggleOutcome::AtCapacity,
            None => {
                self.seats.push(seat.clone());
                ToggleOutcome::Selected
            },
        };
        self.focused = Some(seat);
        outcome
    }

    /// Focus a seat, or clear the focus with `None`
    ///
    /// Any seat can be focused regardless of status.
    pub fn set_focus(&mut self, seat: Option<SelectedSeat>) {
        self.focused = seat;
    }

    /// Clear the focus only if `seat_id` is the focused seat
    ///
    /// Returns whether the focus was cleared. A late leave event for a seat
    /// that already lost focus does nothing.
    pub fn release_focus(&mut self, seat_id: &SeatId) -> bool {
        if self.is_focused(seat_id) {
            self.focused = None;
            true
        } else {
            false
        }
    }

    /// Remove a seat from the selection; focus is untouched
    ///
    /// Returns whether a seat was removed.
    pub fn remove(&mut self, seat_id: &SeatId) -> bool {
        let before = self.seats.len();
        self.seats.retain(|s| s.id() != seat_id);
        self.seats.len() != before
    }

    /// Empty the selection and clear the focus
    pub fn clear(&mut self) {
        self.seats.clear();
        self.focused = None;
    }

    /// Replace the whole selection; the first seat becomes the focus
    ///
    /// Input beyond [`MAX_SELECTION`] seats, or repeating an id, is dropped.
    pub fn replace(&mut self, seats: Vec<SelectedSeat>) {
        *self = Self::restore(seats);
        self.focused = self.seats.first().cloned();
    }

    /// Sum of selected seat prices
    #[must_use]
    pub fn subtotal(&self, prices: &PriceTable) -> Subtotal {
        self.seats
            .iter()
            .map(|s| Subtotal::from(prices.price_of(s.seat.price_tier)))
            .sum()
    }
}
