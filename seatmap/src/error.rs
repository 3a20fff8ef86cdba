//! Top-level error type for wiring the seating chart together.

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::PersistenceError;

/// Errors surfaced while building or driving a seating chart
#[derive(Debug, thiserror::Error)]
pub enum SeatmapError {
    /// Configuration could not be read
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The venue source could not be set up
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Storage could not be opened
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The store rejected an action
    #[error(transparent)]
    Store(#[from] seatmap_runtime::StoreError),
}

/// Result type alias for seatmap operations
pub type Result<T> = std::result::Result<T, SeatmapError>;
