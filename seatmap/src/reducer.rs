//! Reducer logic for the seating chart.
//!
//! Commands resolve seat ids against the loaded catalog, update the selection
//! synchronously and hand any I/O (catalog fetch, storage reads and writes)
//! back as effects. Effects report their outcome as events.

use crate::adjacency::{FirstFit, MAX_RUN_LENGTH, RunPolicy, find_adjacent};
use crate::catalog::{VenueSource, load_catalog};
use crate::persistence::{
    DARK_MODE_KEY, KeyValueStore, RevisionedWriter, SELECTED_SEATS_KEY, load_or_default,
};
use crate::pricing::PriceTable;
use crate::selection::{SelectedSeat, SelectionState};
use crate::types::{
    LoadState, MIN_PREFERRED_RUN_LENGTH, Notice, PersistenceFailure, SeatingAction, SeatingState,
};
use crate::venue::SeatId;
use seatmap_core::{SmallVec, effect::Effect, environment::Clock, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Environment dependencies for the seating reducer
#[derive(Clone)]
pub struct SeatingEnvironment {
    /// Where the venue document comes from
    pub venue_source: Arc<dyn VenueSource>,
    /// Storage for the selection and preferences
    pub storage: Arc<RevisionedWriter>,
    /// Tier prices
    pub prices: Arc<PriceTable>,
    /// Clock for timestamping failures
    pub clock: Arc<dyn Clock>,
    /// How the adjacency search picks a run
    pub run_policy: Arc<dyn RunPolicy>,
}

impl SeatingEnvironment {
    /// Creates a new `SeatingEnvironment` using first-fit adjacency search
    #[must_use]
    pub fn new(
        venue_source: Arc<dyn VenueSource>,
        store: Arc<dyn KeyValueStore>,
        prices: PriceTable,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            venue_source,
            storage: Arc::new(RevisionedWriter::new(store)),
            prices: Arc::new(prices),
            clock,
            run_policy: Arc::new(FirstFit),
        }
    }

    /// Use a different adjacency policy
    #[must_use]
    pub fn with_run_policy(mut self, policy: Arc<dyn RunPolicy>) -> Self {
        self.run_policy = policy;
        self
    }
}

impl std::fmt::Debug for SeatingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatingEnvironment")
            .field("venue_source", &self.venue_source.describe())
            .field("prices", &self.prices)
            .finish_non_exhaustive()
    }
}

type Effects = SmallVec<[Effect<SeatingAction>; 4]>;

/// Reducer for the seating chart
#[derive(Clone, Debug, Default)]
pub struct SeatingReducer;

impl SeatingReducer {
    /// Creates a new `SeatingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves a seat id against the loaded catalog
    fn resolve(state: &SeatingState, seat_id: &SeatId) -> Option<SelectedSeat> {
        let Some(catalog) = state.catalog() else {
            tracing::debug!(%seat_id, "Venue not loaded, ignoring seat command");
            return None;
        };
        let Some(found) = catalog.locate(seat_id) else {
            tracing::warn!(%seat_id, "Unknown seat id, ignoring");
            return None;
        };
        Some(SelectedSeat::from(found))
    }

    /// Validates a run length for the run length control
    fn validate_run_length(run_length: usize) -> Result<(), String> {
        if (MIN_PREFERRED_RUN_LENGTH..=MAX_RUN_LENGTH).contains(&run_length) {
            Ok(())
        } else {
            Err(format!(
                "Run length {run_length} outside {MIN_PREFERRED_RUN_LENGTH}..={MAX_RUN_LENGTH}"
            ))
        }
    }

    /// Records a selection change and schedules the write
    fn selection_changed(state: &mut SeatingState, env: &SeatingEnvironment) -> Effects {
        state.notice = None;
        tracing::debug!(
            selected = state.selection.len(),
            subtotal = state.selection.subtotal(&env.prices),
            "Selection changed"
        );
        let seats = state.selection.seats().to_vec();
        Self::persist(state, env, SELECTED_SEATS_KEY, seats)
    }

    /// Bumps the revision and returns an effect writing `value` under `key`
    fn persist<T>(
        state: &mut SeatingState,
        env: &SeatingEnvironment,
        key: &'static str,
        value: T,
    ) -> Effects
    where
        T: Serialize + Send + 'static,
    {
        state.revision += 1;
        let revision = state.revision;

        let storage = Arc::clone(&env.storage);
        smallvec![Effect::future(async move {
            let written =
                tokio::task::spawn_blocking(move || storage.write(key, revision, &value)).await;
            let message = match written {
                Ok(Ok(_)) => return None,
                Ok(Err(error)) => error.to_string(),
                Err(join_error) => join_error.to_string(),
            };
            tracing::warn!(key, revision, %message, "Storage write failed");
            Some(SeatingAction::PersistenceFailed {
                key: key.to_string(),
                message,
            })
        })]
    }

    /// Effect fetching the venue document
    fn load_venue(env: &SeatingEnvironment) -> Effect<SeatingAction> {
        let source = Arc::clone(&env.venue_source);
        Effect::future(async move {
            match load_catalog(source.as_ref()).await {
                Ok(catalog) => Some(SeatingAction::VenueLoaded {
                    catalog: Arc::new(catalog),
                }),
                Err(error) => {
                    tracing::error!(%error, "Venue load failed");
                    Some(SeatingAction::VenueLoadFailed {
                        reason: error.to_string(),
                    })
                },
            }
        })
    }

    /// Effect reading the persisted selection and preference
    fn restore_session(env: &SeatingEnvironment, since_revision: u64) -> Effect<SeatingAction> {
        let store = Arc::clone(env.storage.store());
        Effect::future(async move {
            let read = tokio::task::spawn_blocking(move || {
                let seats: Vec<SelectedSeat> =
                    load_or_default(store.as_ref(), SELECTED_SEATS_KEY, Vec::new());
                let dark_mode = load_or_default(store.as_ref(), DARK_MODE_KEY, false);
                (seats, dark_mode)
            })
            .await;
            match read {
                Ok((seats, dark_mode)) => Some(SeatingAction::SessionRestored {
                    seats,
                    dark_mode,
                    since_revision,
                }),
                Err(error) => {
                    tracing::warn!(%error, "Session restore task failed, starting fresh");
                    None
                },
            }
        })
    }

    /// Applies an event to state
    fn apply_event(state: &mut SeatingState, action: &SeatingAction, env: &SeatingEnvironment) {
        match action {
            SeatingAction::VenueLoaded { .. } | SeatingAction::VenueLoadFailed { .. }
                if !state.is_loading() =>
            {
                tracing::warn!(load = ?state.load, "Load result without a fetch in flight, ignoring");
            },
            SeatingAction::VenueLoaded { catalog } => {
                state.load = LoadState::Ready(Arc::clone(catalog));
            },
            SeatingAction::VenueLoadFailed { reason } => {
                state.load = LoadState::Failed {
                    reason: reason.clone(),
                };
            },
            SeatingAction::SessionRestored {
                seats,
                dark_mode,
                since_revision,
            } => {
                if state.revision != *since_revision {
                    tracing::info!(
                        since_revision,
                        current = state.revision,
                        "Selection changed during restore, keeping current state"
                    );
                    return;
                }
                state.selection = SelectionState::restore(seats.clone());
                state.preferences.dark_mode = *dark_mode;
            },
            SeatingAction::PersistenceFailed { key, message } => {
                state.last_persistence_error = Some(PersistenceFailure {
                    key: key.clone(),
                    message: message.clone(),
                    at: env.clock.now(),
                });
            },
            // Commands are not applied to state
            _ => {},
        }
    }
}

impl seatmap_core::reducer::Reducer for SeatingReducer {
    type State = SeatingState;
    type Action = SeatingAction;
    type Environment = SeatingEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            // ========== Commands ==========
            SeatingAction::LoadVenue => match state.load {
                LoadState::Idle | LoadState::Failed { .. } => {
                    state.load = LoadState::Loading;
                    smallvec![Self::load_venue(env)]
                },
                LoadState::Loading => {
                    tracing::debug!("Venue fetch already in flight");
                    SmallVec::new()
                },
                LoadState::Ready(_) => {
                    tracing::debug!("Venue already loaded");
                    SmallVec::new()
                },
            },

            SeatingAction::RestoreSession => {
                smallvec![Self::restore_session(env, state.revision)]
            },

            SeatingAction::ToggleSeat { seat_id } => {
                let Some(seat) = Self::resolve(state, &seat_id) else {
                    return SmallVec::new();
                };
                let outcome = state.selection.toggle(seat);
                tracing::debug!(%seat_id, ?outcome, "Seat toggled");
                if outcome.changed_selection() {
                    Self::selection_changed(state, env)
                } else {
                    SmallVec::new()
                }
            },

            SeatingAction::FocusSeat { seat_id } => {
                if let Some(seat) = Self::resolve(state, &seat_id) {
                    state.selection.set_focus(Some(seat));
                }
                SmallVec::new()
            },

            SeatingAction::BlurSeat { seat_id } => {
                state.selection.release_focus(&seat_id);
                SmallVec::new()
            },

            SeatingAction::RemoveSeat { seat_id } => {
                if state.selection.remove(&seat_id) {
                    Self::selection_changed(state, env)
                } else {
                    tracing::debug!(%seat_id, "Seat not selected, nothing to remove");
                    SmallVec::new()
                }
            },

            SeatingAction::ClearSelection => {
                let had_seats = !state.selection.is_empty();
                state.selection.clear();
                if had_seats {
                    Self::selection_changed(state, env)
                } else {
                    state.notice = None;
                    SmallVec::new()
                }
            },

            SeatingAction::SetRunLength { run_length } => {
                match Self::validate_run_length(run_length) {
                    Ok(()) => state.preferences.run_length = run_length,
                    Err(error) => tracing::warn!(%error, "Ignoring run length"),
                }
                SmallVec::new()
            },

            SeatingAction::FindAdjacentSeats => {
                let Some(catalog) = state.catalog().cloned() else {
                    tracing::debug!("Venue not loaded, ignoring adjacency search");
                    return SmallVec::new();
                };
                let run_length = state.preferences.run_length;
                match find_adjacent(catalog.venue(), run_length, env.run_policy.as_ref()) {
                    Some(seats) => {
                        state.selection.replace(seats);
                        Self::selection_changed(state, env)
                    },
                    None => {
                        tracing::info!(run_length, "No adjacent run available");
                        state.notice = Some(Notice::AdjacencyNotFound { run_length });
                        SmallVec::new()
                    },
                }
            },

            SeatingAction::ToggleHeatMap => {
                state.preferences.heat_map = !state.preferences.heat_map;
                SmallVec::new()
            },

            SeatingAction::ToggleDarkMode => {
                state.preferences.dark_mode = !state.preferences.dark_mode;
                let dark_mode = state.preferences.dark_mode;
                Self::persist(state, env, DARK_MODE_KEY, dark_mode)
            },

            SeatingAction::DismissNotice => {
                state.notice = None;
                SmallVec::new()
            },

            // ========== Events ==========
            SeatingAction::VenueLoaded { .. }
            | SeatingAction::VenueLoadFailed { .. }
            | SeatingAction::SessionRestored { .. }
            | SeatingAction::PersistenceFailed { .. } => {
                Self::apply_event(state, &action, env);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FileVenueSource};
    use crate::persistence::MemoryStore;
    use crate::selection::MAX_SELECTION;
    use crate::venue::{Row, Seat, SeatStatus, Section, Venue};
    use chrono::TimeZone;
    use seatmap_core::reducer::Reducer;
    use seatmap_testing::{ReducerTest, assertions, mocks::FixedClock};

    fn env() -> SeatingEnvironment {
        SeatingEnvironment::new(
            Arc::new(FileVenueSource::new("unused.json")),
            Arc::new(MemoryStore::new()),
            PriceTable::standard(),
            Arc::new(FixedClock::new(chrono::Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap())),
        )
    }

    /// Row 1: cols 1..=10 available. Row 2: 1 sold, 2 held, 3..=4 available.
    fn loaded_state() -> SeatingState {
        let row1 = Row::new(
            1,
            (1..=10)
                .map(|col| Seat::new(format!("A-1-{col}"), col, 1, SeatStatus::Available))
                .collect(),
        );
        let row2 = Row::new(
            2,
            vec![
                Seat::new("A-2-1", 1, 2, SeatStatus::Sold),
                Seat::new("A-2-2", 2, 2, SeatStatus::Held),
                Seat::new("A-2-3", 3, 2, SeatStatus::Available),
                Seat::new("A-2-4", 4, 2, SeatStatus::Available),
            ],
        );
        let venue = Venue::new("Hall", vec![Section::new("A", "Section A", vec![row1, row2])]);
        let mut state = SeatingState::default();
        state.load = LoadState::Ready(Arc::new(Catalog::new(venue).unwrap()));
        state
    }

    fn toggled(ids: &[&str]) -> SeatingState {
        let mut state = loaded_state();
        let env = env();
        for id in ids {
            SeatingReducer.reduce(&mut state, SeatingAction::ToggleSeat { seat_id: SeatId::new(*id) }, &env);
        }
        state
    }

    fn ready(venue: Venue) -> LoadState {
        LoadState::Ready(Arc::new(Catalog::new(venue).unwrap()))
    }

    #[test]
    fn toggle_available_seat_selects_and_persists() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(SeatingAction::ToggleSeat {
                seat_id: SeatId::new("A-1-3"),
            })
            .then_state(|state| {
                assert_eq!(state.selection.len(), 1);
                assert!(state.selection.is_focused(&SeatId::new("A-1-3")));
                assert_eq!(state.selection.seats()[0].section_label, "Section A");
                assert_eq!(state.revision, 1);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn toggle_sold_seat_changes_nothing() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(SeatingAction::ToggleSeat {
                seat_id: SeatId::new("A-2-1"),
            })
            .then_state(|state| {
                assert!(state.selection.is_empty());
                assert!(state.selection.focused().is_none());
                assert_eq!(state.revision, 0);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn toggle_unknown_seat_is_ignored() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(SeatingAction::ToggleSeat {
                seat_id: SeatId::new("Z-9-9"),
            })
            .then_state(|state| assert!(state.selection.is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn toggle_before_load_is_ignored() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::ToggleSeat {
                seat_id: SeatId::new("A-1-1"),
            })
            .then_state(|state| assert!(state.selection.is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn ninth_toggle_only_moves_focus() {
        let ids: Vec<String> = (1..=8).map(|c| format!("A-1-{c}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(toggled(&refs))
            .when_action(SeatingAction::ToggleSeat {
                seat_id: SeatId::new("A-1-9"),
            })
            .then_state(|state| {
                assert_eq!(state.selection.len(), MAX_SELECTION);
                assert!(!state.selection.contains(&SeatId::new("A-1-9")));
                assert!(state.selection.is_focused(&SeatId::new("A-1-9")));
                assert_eq!(state.revision, 8);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn focus_and_guarded_blur() {
        let mut state = loaded_state();
        let env = env();
        let reducer = SeatingReducer::new();

        reducer.reduce(&mut state, SeatingAction::FocusSeat { seat_id: SeatId::new("A-2-1") }, &env);
        assert!(state.selection.is_focused(&SeatId::new("A-2-1")));

        // A late blur from the previous seat must not clear the new focus
        reducer.reduce(&mut state, SeatingAction::BlurSeat { seat_id: SeatId::new("A-1-1") }, &env);
        assert!(state.selection.is_focused(&SeatId::new("A-2-1")));

        reducer.reduce(&mut state, SeatingAction::BlurSeat { seat_id: SeatId::new("A-2-1") }, &env);
        assert!(state.selection.focused().is_none());
    }

    #[test]
    fn remove_unselected_seat_is_a_no_op() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(toggled(&["A-1-1"]))
            .when_action(SeatingAction::RemoveSeat {
                seat_id: SeatId::new("A-1-2"),
            })
            .then_state(|state| {
                assert_eq!(state.selection.len(), 1);
                assert_eq!(state.revision, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn clear_selection_drops_seats_and_focus() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(toggled(&["A-1-1", "A-1-2"]))
            .when_action(SeatingAction::ClearSelection)
            .then_state(|state| {
                assert!(state.selection.is_empty());
                assert!(state.selection.focused().is_none());
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn adjacency_skips_unavailable_seats() {
        let mut state = loaded_state();
        state.load = ready(Venue::new(
            "Hall",
            vec![Section::new(
                "A",
                "Section A",
                vec![Row::new(
                    2,
                    vec![
                        Seat::new("A-2-1", 1, 2, SeatStatus::Sold),
                        Seat::new("A-2-2", 2, 2, SeatStatus::Held),
                        Seat::new("A-2-3", 3, 2, SeatStatus::Available),
                        Seat::new("A-2-4", 4, 2, SeatStatus::Available),
                    ],
                )],
            )],
        ));

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(SeatingAction::FindAdjacentSeats)
            .then_state(|state| {
                let cols: Vec<i32> = state.selection.seats().iter().map(|s| s.seat.col).collect();
                assert_eq!(cols, [3, 4]);
                assert!(state.selection.is_focused(&SeatId::new("A-2-3")));
                assert!(state.notice.is_none());
                assert_eq!(state.revision, 1);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn adjacency_miss_sets_notice_and_keeps_selection() {
        let mut state = toggled(&["A-1-1"]);
        state.preferences.run_length = 5;
        state.load = ready(Venue::new(
            "Hall",
            vec![Section::new(
                "A",
                "Section A",
                vec![Row::new(
                    1,
                    (1..=4)
                        .map(|col| Seat::new(format!("A-1-{col}"), col, 1, SeatStatus::Available))
                        .collect(),
                )],
            )],
        ));

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(SeatingAction::FindAdjacentSeats)
            .then_state(|state| {
                assert_eq!(state.selection.len(), 1);
                assert_eq!(state.notice, Some(Notice::AdjacencyNotFound { run_length: 5 }));
                assert_eq!(state.revision, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn run_length_outside_control_range_is_ignored() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::SetRunLength { run_length: 9 })
            .then_state(|state| assert_eq!(state.preferences.run_length, 2))
            .run();

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::SetRunLength { run_length: 5 })
            .then_state(|state| assert_eq!(state.preferences.run_length, 5))
            .run();
    }

    #[test]
    fn heat_map_is_not_persisted_but_dark_mode_is() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::ToggleHeatMap)
            .then_state(|state| assert!(state.preferences.heat_map))
            .then_effects(assertions::assert_no_effects)
            .run();

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::ToggleDarkMode)
            .then_state(|state| {
                assert!(state.preferences.dark_mode);
                assert_eq!(state.revision, 1);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn stale_restore_is_discarded() {
        let state = toggled(&["A-1-1"]);
        let restored = SelectedSeat::from(
            state
                .catalog()
                .unwrap()
                .locate(&SeatId::new("A-1-5"))
                .unwrap(),
        );

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(SeatingAction::SessionRestored {
                seats: vec![restored],
                dark_mode: true,
                since_revision: 0,
            })
            .then_state(|state| {
                assert!(state.selection.contains(&SeatId::new("A-1-1")));
                assert!(!state.selection.contains(&SeatId::new("A-1-5")));
                assert!(!state.preferences.dark_mode);
            })
            .run();
    }

    fn loading() -> SeatingState {
        SeatingState {
            load: LoadState::Loading,
            ..SeatingState::default()
        }
    }

    #[test]
    fn load_failure_is_terminal_state() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(loading())
            .when_action(SeatingAction::VenueLoadFailed {
                reason: "malformed venue document".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.load_error(), Some("malformed venue document"));
                assert!(!state.is_loading());
            })
            .run();
    }

    #[test]
    fn persistence_failure_is_timestamped() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::PersistenceFailed {
                key: SELECTED_SEATS_KEY.to_string(),
                message: "disk full".to_string(),
            })
            .then_state(|state| {
                let failure = state.last_persistence_error.as_ref().unwrap();
                assert_eq!(failure.key, SELECTED_SEATS_KEY);
                assert_eq!(failure.at, chrono::Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());
            })
            .run();
    }

    #[test]
    fn load_venue_is_skipped_once_ready() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(SeatingAction::LoadVenue)
            .then_state(|state| assert!(state.catalog().is_some()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn load_venue_starts_one_fetch_from_idle() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::LoadVenue)
            .then_state(|state| assert!(state.is_loading()))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn load_venue_while_in_flight_is_not_refetched() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(loading())
            .when_action(SeatingAction::LoadVenue)
            .then_state(|state| assert!(state.is_loading()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn load_venue_after_failure_fetches_again() {
        let state = SeatingState {
            load: LoadState::Failed {
                reason: "timed out".to_string(),
            },
            ..SeatingState::default()
        };

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(SeatingAction::LoadVenue)
            .then_state(|state| assert!(state.is_loading()))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn late_load_failure_keeps_loaded_catalog() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(toggled(&["A-1-1"]))
            .when_action(SeatingAction::VenueLoadFailed {
                reason: "connection reset".to_string(),
            })
            .then_state(|state| {
                assert!(state.catalog().is_some());
                assert!(state.load_error().is_none());
                assert_eq!(state.selection.len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn late_venue_loaded_does_not_replace_catalog() {
        let state = toggled(&["A-1-1"]);
        let original = Arc::clone(state.catalog().unwrap());
        let other = Catalog::new(Venue::new("Other", vec![])).unwrap();

        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(SeatingAction::VenueLoaded {
                catalog: Arc::new(other),
            })
            .then_state(move |state| {
                assert!(Arc::ptr_eq(state.catalog().unwrap(), &original));
                assert_eq!(state.selection.len(), 1);
            })
            .run();
    }

    #[test]
    fn load_result_before_any_request_is_ignored() {
        ReducerTest::new(SeatingReducer::new())
            .with_env(env())
            .given_state(SeatingState::default())
            .when_action(SeatingAction::VenueLoadFailed {
                reason: "stray".to_string(),
            })
            .then_state(|state| {
                assert!(matches!(state.load, LoadState::Idle));
                assert!(state.load_error().is_none());
            })
            .run();
    }
}
