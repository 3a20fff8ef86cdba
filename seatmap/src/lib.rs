//! # Seatmap
//!
//! Seat selection engine for an interactive venue seating chart.
//!
//! - [`venue`] and [`catalog`]: the venue document, validated and indexed
//! - [`selection`]: the selection state machine (toggle, focus, remove,
//!   clear, replace) with an eight-seat cap
//! - [`adjacency`]: first-fit search for adjacent available seats
//! - [`presentation`]: colors, outlines, labels and summaries for renderers
//! - [`persistence`]: key/value storage for the selection and preferences
//! - [`reducer`]: the [`SeatingReducer`] tying it all together
//!
//! ## Example
//!
//! ```no_run
//! use seatmap::{Config, SeatingAction, store_from_config};
//!
//! # async fn run() -> seatmap::error::Result<()> {
//! let config = Config::from_env()?;
//! let store = store_from_config(&config)?;
//!
//! store.send_and_wait_for(
//!     SeatingAction::LoadVenue,
//!     |a| matches!(a, SeatingAction::VenueLoaded { .. } | SeatingAction::VenueLoadFailed { .. }),
//!     std::time::Duration::from_secs(10),
//! ).await?;
//! # Ok(())
//! # }
//! ```

pub mod adjacency;
pub mod catalog;
pub mod config;
pub mod error;
pub mod persistence;
pub mod presentation;
pub mod pricing;
pub mod reducer;
pub mod selection;
pub mod types;
pub mod venue;

pub use config::Config;
pub use reducer::{SeatingEnvironment, SeatingReducer};
pub use types::{LoadState, Notice, SeatingAction, SeatingState};

use crate::catalog::source_for;
use crate::persistence::{FileStore, KeyValueStore, MemoryStore};
use seatmap_core::environment::SystemClock;
use seatmap_runtime::Store;
use std::sync::Arc;

/// Store driving the seating chart
pub type SeatingStore = Store<SeatingState, SeatingAction, SeatingEnvironment, SeatingReducer>;

/// Build the production environment described by `config`
///
/// # Errors
///
/// Returns an error if the HTTP client or the storage directory cannot be set
/// up.
pub fn environment_from_config(config: &Config) -> error::Result<SeatingEnvironment> {
    let venue_source = source_for(&config.venue.source, config.venue.http_timeout)?;
    let store: Arc<dyn KeyValueStore> = match &config.storage.dir {
        Some(dir) => Arc::new(FileStore::open(dir)?),
        None => Arc::new(MemoryStore::new()),
    };

    Ok(SeatingEnvironment::new(
        Arc::from(venue_source),
        store,
        config.selection.prices.clone(),
        Arc::new(SystemClock),
    ))
}

/// Build a store with a fresh state and the production environment
///
/// # Errors
///
/// Returns an error if the environment cannot be built.
pub fn store_from_config(config: &Config) -> error::Result<SeatingStore> {
    let environment = environment_from_config(config)?;
    Ok(Store::new(
        SeatingState::new(config.selection.default_run_length),
        SeatingReducer::new(),
        environment,
    ))
}
