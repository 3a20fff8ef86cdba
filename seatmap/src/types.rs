//! State and actions for the seating chart.
//!
//! `SeatingState` is the single explicit state object behind the chart. It
//! changes only through [`crate::reducer::SeatingReducer`]; renderers read it
//! and derive everything else through [`crate::presentation`].

use crate::catalog::Catalog;
use crate::pricing::{PriceTable, Subtotal};
use crate::presentation::{SeatAppearance, SeatDetails, SelectionSummary, appearance};
use crate::selection::{SelectedSeat, SelectionState};
use crate::venue::SeatId;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Run length used until the user picks another one
pub const DEFAULT_RUN_LENGTH: usize = 2;

/// Smallest run length the run length control offers
pub const MIN_PREFERRED_RUN_LENGTH: usize = 2;

/// Catalog load lifecycle
///
/// `Idle` until `LoadVenue` is sent, then `Loading` while the one fetch is in
/// flight. `Failed` is shown as an error screen; nothing retries automatically.
#[derive(Clone, Debug, Default)]
pub enum LoadState {
    /// No fetch requested yet
    #[default]
    Idle,
    /// Waiting for the venue document
    Loading,
    /// Catalog available
    Ready(Arc<Catalog>),
    /// Loading failed
    Failed {
        /// Human-readable reason
        reason: String,
    },
}

/// Display preferences
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preferences {
    /// Dark theme; persisted
    pub dark_mode: bool,
    /// Color available seats by price tier; session only
    pub heat_map: bool,
    /// Number of seats the adjacency search looks for
    pub run_length: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            heat_map: false,
            run_length: DEFAULT_RUN_LENGTH,
        }
    }
}

/// Transient message for the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The adjacency search found no run of the requested length
    AdjacencyNotFound {
        /// Requested run length
        run_length: usize,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::AdjacencyNotFound { run_length } => {
                write!(f, "Could not find {run_length} adjacent available seats")
            },
        }
    }
}

/// Most recent storage write failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistenceFailure {
    /// Key that failed to write
    pub key: String,
    /// Error message
    pub message: String,
    /// When the failure was reported
    pub at: DateTime<Utc>,
}

/// State of the seating chart
#[derive(Clone, Debug, Default)]
pub struct SeatingState {
    /// Catalog load lifecycle
    pub load: LoadState,
    /// Selected seats and focus
    pub selection: SelectionState,
    /// Display preferences
    pub preferences: Preferences,
    /// Message for the user, cleared by the next selection change
    pub notice: Option<Notice>,
    /// Last storage write that failed
    pub last_persistence_error: Option<PersistenceFailure>,
    /// Bumped on every persisted change; orders storage writes
    pub revision: u64,
}

impl SeatingState {
    /// Fresh state with a chosen default run length
    #[must_use]
    pub fn new(run_length: usize) -> Self {
        Self {
            preferences: Preferences {
                run_length,
                ..Preferences::default()
            },
            ..Self::default()
        }
    }

    /// The catalog, once loaded
    #[must_use]
    pub const fn catalog(&self) -> Option<&Arc<Catalog>> {
        match &self.load {
            LoadState::Ready(catalog) => Some(catalog),
            LoadState::Idle | LoadState::Loading | LoadState::Failed { .. } => None,
        }
    }

    /// Whether the catalog is still loading
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    /// Load failure reason, if loading failed
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed { reason } => Some(reason),
            LoadState::Idle | LoadState::Loading | LoadState::Ready(_) => None,
        }
    }

    /// Sum of selected seat prices
    #[must_use]
    pub fn subtotal(&self, prices: &PriceTable) -> Subtotal {
        self.selection.subtotal(prices)
    }

    /// Summary panel for the current selection
    #[must_use]
    pub fn summary(&self, prices: &PriceTable) -> SelectionSummary {
        SelectionSummary::new(&self.selection, prices)
    }

    /// Details panel for the focused seat
    #[must_use]
    pub fn focused_details(&self, prices: &PriceTable) -> Option<SeatDetails> {
        self.selection
            .focused()
            .map(|seat| SeatDetails::new(seat, prices))
    }

    /// Appearance of one catalog seat, if the catalog is loaded and has it
    #[must_use]
    pub fn appearance_of(&self, seat_id: &SeatId, prices: &PriceTable) -> Option<SeatAppearance> {
        let found = self.catalog()?.locate(seat_id)?;
        Some(appearance(
            &found,
            &self.selection,
            self.preferences.heat_map,
            prices,
        ))
    }
}

/// Actions for the seating chart
///
/// Commands come from the user or the host; events are fed back by effects.
#[derive(Clone, Debug)]
pub enum SeatingAction {
    // ========== Commands ==========
    /// Fetch the venue document
    LoadVenue,
    /// Read the persisted selection and dark-mode preference
    RestoreSession,
    /// Click or keyboard activation on a seat
    ToggleSeat {
        /// Seat activated
        seat_id: SeatId,
    },
    /// Hover or keyboard focus entered a seat
    FocusSeat {
        /// Seat entered
        seat_id: SeatId,
    },
    /// Hover or keyboard focus left a seat
    BlurSeat {
        /// Seat left
        seat_id: SeatId,
    },
    /// Remove one seat from the selection
    RemoveSeat {
        /// Seat to remove
        seat_id: SeatId,
    },
    /// Empty the selection
    ClearSelection,
    /// Change the adjacency run length
    SetRunLength {
        /// New run length
        run_length: usize,
    },
    /// Replace the selection with the first adjacent run
    FindAdjacentSeats,
    /// Flip the price heat-map
    ToggleHeatMap,
    /// Flip the dark theme
    ToggleDarkMode,
    /// Dismiss the current notice
    DismissNotice,

    // ========== Events ==========
    /// The venue document loaded and validated
    VenueLoaded {
        /// Validated catalog
        catalog: Arc<Catalog>,
    },
    /// The venue document could not be loaded
    VenueLoadFailed {
        /// Human-readable reason
        reason: String,
    },
    /// Persisted values were read
    SessionRestored {
        /// Persisted selection
        seats: Vec<SelectedSeat>,
        /// Persisted dark-mode preference
        dark_mode: bool,
        /// State revision when the restore started
        since_revision: u64,
    },
    /// A storage write failed
    PersistenceFailed {
        /// Key being written
        key: String,
        /// Error message
        message: String,
    },
}

impl SeatingAction {
    /// Whether this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        !self.is_event()
    }

    /// Whether this action is an event fed back by an effect
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            SeatingAction::VenueLoaded { .. }
                | SeatingAction::VenueLoadFailed { .. }
                | SeatingAction::SessionRestored { .. }
                | SeatingAction::PersistenceFailed { .. }
        )
    }
}
