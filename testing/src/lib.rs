//! # Seatmap Testing
//!
//! Testing utilities for the seatmap selection engine.
//!
//! This crate provides:
//! - Mock implementations of environment traits (clock, venue source, storage)
//! - Venue fixtures with known layouts
//! - Property-based testing strategies for seating actions
//! - The [`ReducerTest`] Given/When/Then harness and effect assertions
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_testing::{fixtures, mocks::{FlakyStore, StaticVenueSource}, test_clock};
//!
//! #[tokio::test]
//! async fn selection_survives_reload() {
//!     let storage = Arc::new(FlakyStore::new());
//!     let env = SeatingEnvironment::new(
//!         Arc::new(StaticVenueSource::new(fixtures::sample_venue())),
//!         storage.clone(),
//!         PriceTable::standard(),
//!         Arc::new(test_clock()),
//!     );
//!     let store = Store::new(SeatingState::default(), SeatingReducer::new(), env);
//!     // ...
//! }
//! ```

use chrono::{DateTime, Utc};
use seatmap_core::environment::Clock;


/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use futures::future::BoxFuture;
    use seatmap::catalog::{CatalogError, VenueSource, parse_venue};
    use seatmap::persistence::{KeyValueStore, MemoryStore, PersistenceError};
    use seatmap::venue::Venue;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock frozen at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock frozen at 2025-01-01T00:00:00Z
    ///
    /// # Panics
    ///
    /// Never; the timestamp is a literal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    #[derive(Debug, Clone)]
    enum Document {
        Venue(Venue),
        Raw(Vec<u8>),
    }

    /// Venue source serving a fixed document from memory
    #[derive(Debug)]
    pub struct StaticVenueSource {
        document: Document,
        delay: Option<Duration>,
        fetches: AtomicUsize,
    }

    impl StaticVenueSource {
        /// Serve `venue`
        #[must_use]
        pub const fn new(venue: Venue) -> Self {
            Self {
                document: Document::Venue(venue),
                delay: None,
                fetches: AtomicUsize::new(0),
            }
        }

        /// Serve raw bytes, parsed like a real document
        #[must_use]
        pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
            Self {
                document: Document::Raw(bytes.into()),
                delay: None,
                fetches: AtomicUsize::new(0),
            }
        }

        /// Wait before answering each fetch
        #[must_use]
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Number of fetches so far
        #[must_use]
        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl VenueSource for StaticVenueSource {
        fn fetch(&self) -> BoxFuture<'_, Result<Venue, CatalogError>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                match &self.document {
                    Document::Venue(venue) => Ok(venue.clone()),
                    Document::Raw(bytes) => parse_venue(bytes),
                }
            })
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    /// In-memory storage with switchable failures
    #[derive(Debug, Default)]
    pub struct FlakyStore {
        inner: MemoryStore,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    impl FlakyStore {
        /// Working store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every read fail (or work again)
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Make every write fail (or work again)
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of successful writes
        #[must_use]
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Stored value as a UTF-8 string, bypassing failure injection
        #[must_use]
        pub fn peek(&self, key: &str) -> Option<String> {
            self.inner
                .get(key)
                .ok()
                .flatten()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(PersistenceError::Unavailable("injected read failure".to_string()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PersistenceError::Unavailable("injected write failure".to_string()));
            }
            self.inner.set(key, value)?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), PersistenceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PersistenceError::Unavailable("injected write failure".to_string()));
            }
            self.inner.remove(key)
        }
    }
}

/// Venues with known layouts
pub mod fixtures {
    use seatmap::venue::{Row, Seat, SeatStatus, Section, SectionTransform, Venue};

    /// A row whose seats run from column 1 to `max_col`; listed columns are
    /// available and the rest sold
    ///
    /// Seat ids are `{section}-{row}-{col}`.
    #[must_use]
    pub fn row(section: &str, index: i32, available_cols: &[i32], max_col: i32, tier: u8) -> Row {
        Row::new(
            index,
            (1..=max_col)
                .map(|col| {
                    let status = if available_cols.contains(&col) {
                        SeatStatus::Available
                    } else {
                        SeatStatus::Sold
                    };
                    Seat::new(format!("{section}-{index}-{col}"), col, tier, status)
                        .at(f64::from(col) * 30.0, f64::from(index) * 30.0)
                })
                .collect(),
        )
    }

    /// A venue with one section `A` holding `rows`
    #[must_use]
    pub fn single_section(rows: Vec<Row>) -> Venue {
        Venue::new("Test Hall", vec![Section::new("A", "Section A", rows)])
    }

    /// Two-section venue used across integration tests
    ///
    /// - `A` ("Orchestra"), tier 1: row 1 has columns 1..=6 with 3 and 4
    ///   available; row 2 has columns 1..=6 with 2, 5 and 6 available
    /// - `B` ("Balcony"), tier 3: row 1 has columns 1..=10, all available
    ///   except 4 (held) and 9 (reserved)
    #[must_use]
    pub fn sample_venue() -> Venue {
        let mut balcony = row("B", 1, &(1..=10).collect::<Vec<_>>(), 10, 3);
        balcony.seats[3].status = SeatStatus::Held;
        balcony.seats[8].status = SeatStatus::Reserved;

        Venue::new(
            "Sample Theatre",
            vec![
                Section::new(
                    "A",
                    "Orchestra",
                    vec![row("A", 1, &[3, 4], 6, 1), row("A", 2, &[2, 5, 6], 6, 1)],
                ),
                Section::new("B", "Balcony", vec![balcony]).with_transform(SectionTransform {
                    x: 0.0,
                    y: 200.0,
                    scale: 0.5,
                }),
            ],
        )
    }

    /// One row of `seats` available seats, tier 2
    #[must_use]
    pub fn open_row(seats: i32) -> Venue {
        single_section(vec![row("A", 1, &(1..=seats).collect::<Vec<_>>(), seats, 2)])
    }
}

/// Property-based testing strategies
pub mod properties {
    use proptest::prelude::*;
    use seatmap::SeatingAction;
    use seatmap::venue::SeatId;

    /// Any user command over `seat_ids`
    ///
    /// Seat commands pick from `seat_ids` plus one id that is not in any
    /// catalog.
    pub fn seating_command(seat_ids: Vec<SeatId>) -> impl Strategy<Value = SeatingAction> {
        let mut ids = seat_ids;
        ids.push(SeatId::new("no-such-seat"));
        let id = proptest::sample::select(ids);

        prop_oneof![
            6 => id.clone().prop_map(|seat_id| SeatingAction::ToggleSeat { seat_id }),
            2 => id.clone().prop_map(|seat_id| SeatingAction::FocusSeat { seat_id }),
            2 => id.clone().prop_map(|seat_id| SeatingAction::BlurSeat { seat_id }),
            2 => id.prop_map(|seat_id| SeatingAction::RemoveSeat { seat_id }),
            1 => Just(SeatingAction::ClearSelection),
            1 => (0_usize..=10).prop_map(|run_length| SeatingAction::SetRunLength { run_length }),
            1 => Just(SeatingAction::FindAdjacentSeats),
            1 => Just(SeatingAction::ToggleHeatMap),
        ]
    }
}

/// Test helpers
pub mod helpers {
    use seatmap_core::reducer::Reducer;
    use seatmap_runtime::Store;
    use std::time::Duration;

    /// Install a test-friendly tracing subscriber; later calls are no-ops
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "seatmap=debug".into()),
            )
            .with_test_writer()
            .try_init();
    }

    /// Wait until the store has no running effects
    ///
    /// Returns `false` if effects are still running after `timeout`.
    pub async fn settle<S, A, E, R>(store: &Store<S, A, E, R>, timeout: Duration) -> bool
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        while store.pending_effects() > 0 {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        true
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use seatmap::catalog::{Catalog, VenueSource};
    use seatmap::persistence::KeyValueStore;

    #[test]
    fn fixed_clock_does_not_move() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn sample_venue_is_a_valid_catalog() {
        let catalog = Catalog::new(fixtures::sample_venue()).unwrap();
        assert_eq!(catalog.len(), 6 + 6 + 10);
    }

    #[test]
    fn static_source_counts_fetches() {
        let source = mocks::StaticVenueSource::new(fixtures::open_row(4));
        let venue = tokio_test::block_on(source.fetch()).unwrap();
        assert_eq!(venue.seat_count(), 4);
        assert_eq!(source.fetches(), 1);
    }

    #[test]
    fn raw_source_reports_parse_errors() {
        let source = mocks::StaticVenueSource::raw("{ broken");
        assert!(tokio_test::block_on(source.fetch()).is_err());
    }

    #[test]
    fn flaky_store_injects_failures() {
        let store = mocks::FlakyStore::new();
        store.set("k", b"1").unwrap();
        store.fail_writes(true);
        assert!(store.set("k", b"2").is_err());
        assert_eq!(store.peek("k").as_deref(), Some("1"));
        assert_eq!(store.writes(), 1);

        store.fail_reads(true);
        assert!(store.get("k").is_err());
    }
}
