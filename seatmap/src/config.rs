//! Configuration management for the seating chart.
//!
//! Loads configuration from environment variables with sensible defaults.
//!
//! | Variable                      | Default                     |
//! |-------------------------------|-----------------------------|
//! | `SEATMAP_VENUE_SOURCE`        | bundled `data/venue.json`   |
//! | `SEATMAP_HTTP_TIMEOUT_SECS`   | `10`                        |
//! | `SEATMAP_STORAGE_DIR`         | `.seatmap` (`:memory:` for none) |
//! | `SEATMAP_PRICE_TIERS`         | `1=150,2=100,3=75,4=50`     |
//! | `SEATMAP_DEFAULT_RUN_LENGTH`  | `2`                         |
//! | `SEATMAP_LOG_LEVEL`           | `info`                      |

use crate::adjacency::MAX_RUN_LENGTH;
use crate::pricing::{ParsePriceTableError, PriceTable};
use crate::types::{DEFAULT_RUN_LENGTH, MIN_PREFERRED_RUN_LENGTH};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Storage directory value that selects in-memory storage
pub const MEMORY_STORAGE: &str = ":memory:";

/// Errors produced while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// The price table is malformed
    #[error("invalid SEATMAP_PRICE_TIERS: {0}")]
    PriceTable(#[from] ParsePriceTableError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Venue document configuration
    pub venue: VenueConfig,
    /// Persistence configuration
    pub storage: StorageConfig,
    /// Selection configuration
    pub selection: SelectionConfig,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

/// Venue document configuration
#[derive(Debug, Clone)]
pub struct VenueConfig {
    /// File path or `http(s)://` URL of the venue document
    pub source: String,
    /// Timeout for HTTP fetches
    pub http_timeout: Duration,
}

/// Persistence configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory for stored values; `None` keeps them in memory
    pub dir: Option<PathBuf>,
}

/// Selection configuration
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Tier prices
    pub prices: PriceTable,
    /// Initial adjacency run length
    pub default_run_length: usize,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parse_number = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            lookup(var).map_or(Ok(default), |value| {
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue { var, value })
            })
        };

        let prices = match lookup("SEATMAP_PRICE_TIERS") {
            Some(value) => value.parse()?,
            None => PriceTable::standard(),
        };

        let run_length = parse_number("SEATMAP_DEFAULT_RUN_LENGTH", DEFAULT_RUN_LENGTH as u64)?;
        let default_run_length = usize::try_from(run_length)
            .unwrap_or(MAX_RUN_LENGTH)
            .clamp(MIN_PREFERRED_RUN_LENGTH, MAX_RUN_LENGTH);

        let dir = match lookup("SEATMAP_STORAGE_DIR") {
            Some(value) if value == MEMORY_STORAGE => None,
            Some(value) => Some(PathBuf::from(value)),
            None => Some(PathBuf::from(".seatmap")),
        };

        Ok(Self {
            venue: VenueConfig {
                source: lookup("SEATMAP_VENUE_SOURCE").unwrap_or_else(default_venue_source),
                http_timeout: Duration::from_secs(parse_number("SEATMAP_HTTP_TIMEOUT_SECS", 10)?),
            },
            storage: StorageConfig { dir },
            selection: SelectionConfig {
                prices,
                default_run_length,
            },
            log_level: lookup("SEATMAP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn default_venue_source() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/venue.json").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::venue::PriceTier;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.venue.source.ends_with("data/venue.json"));
        assert_eq!(config.venue.http_timeout, Duration::from_secs(10));
        assert_eq!(config.storage.dir, Some(PathBuf::from(".seatmap")));
        assert_eq!(config.selection.prices, PriceTable::standard());
        assert_eq!(config.selection.default_run_length, 2);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("SEATMAP_VENUE_SOURCE", "https://example.com/venue.json"),
            ("SEATMAP_STORAGE_DIR", MEMORY_STORAGE),
            ("SEATMAP_PRICE_TIERS", "1=300,2=10"),
            ("SEATMAP_DEFAULT_RUN_LENGTH", "4"),
            ("SEATMAP_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.venue.source, "https://example.com/venue.json");
        assert_eq!(config.venue.http_timeout, Duration::from_secs(3));
        assert_eq!(config.storage.dir, None);
        assert_eq!(config.selection.prices.get(PriceTier(1)), Some(300));
        assert_eq!(config.selection.default_run_length, 4);
    }

    #[test]
    fn run_length_is_clamped() {
        let high = Config::from_lookup(lookup(&[("SEATMAP_DEFAULT_RUN_LENGTH", "40")])).unwrap();
        assert_eq!(high.selection.default_run_length, MAX_RUN_LENGTH);

        let low = Config::from_lookup(lookup(&[("SEATMAP_DEFAULT_RUN_LENGTH", "0")])).unwrap();
        assert_eq!(low.selection.default_run_length, MIN_PREFERRED_RUN_LENGTH);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("SEATMAP_HTTP_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::InvalidValue {
                var: "SEATMAP_HTTP_TIMEOUT_SECS",
                ..
            })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("SEATMAP_PRICE_TIERS", "1=")])),
            Err(ConfigError::PriceTable(_))
        ));
    }
}
