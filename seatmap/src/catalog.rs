//! Seat catalog loading
//!
//! A [`VenueSource`] fetches the venue document; [`Catalog::new`] validates it
//! and indexes seats by id. Loading happens once per session and the result is
//! shared read-only behind an `Arc`.
//!
//! # Pattern: Dependency Injection via Traits
//!
//! The reducer never touches the filesystem or the network. It asks the
//! injected `VenueSource` for the document inside an effect, so tests can swap
//! in a static source.

use crate::venue::{SeatId, SeatRef, Venue};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Errors produced while loading the venue document
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Reading the document from disk failed
    #[error("failed to read venue document {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request failed
    #[error("failed to fetch venue document: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("venue document request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// Status code returned
        status: u16,
    },

    /// The document is not valid venue JSON
    #[error("malformed venue document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two seats share an id
    #[error("duplicate seat id {seat_id}")]
    DuplicateSeat {
        /// The repeated id
        seat_id: SeatId,
    },

    /// A row's seats are not in strictly ascending column order
    #[error("row {row} of section {section} is not ordered by ascending column")]
    UnorderedRow {
        /// Section id
        section: String,
        /// Row index
        row: i32,
    },
}

#[derive(Clone, Copy, Debug)]
struct SeatPath {
    section: usize,
    row: usize,
    seat: usize,
}

/// A validated venue with a seat id index
#[derive(Debug)]
pub struct Catalog {
    venue: Venue,
    index: HashMap<SeatId, SeatPath>,
}

impl Catalog {
    /// Validate a venue document and index its seats
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSeat`] when a seat id appears twice and
    /// [`CatalogError::UnorderedRow`] when a row's columns do not strictly
    /// ascend.
    pub fn new(venue: Venue) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(venue.seat_count());

        for (s, section) in venue.sections.iter().enumerate() {
            for (r, row) in section.rows.iter().enumerate() {
                if row.seats.windows(2).any(|pair| pair[0].col >= pair[1].col) {
                    return Err(CatalogError::UnorderedRow {
                        section: section.id.clone(),
                        row: row.index,
                    });
                }
                for (i, seat) in row.seats.iter().enumerate() {
                    let path = SeatPath {
                        section: s,
                        row: r,
                        seat: i,
                    };
                    if index.insert(seat.id.clone(), path).is_some() {
                        return Err(CatalogError::DuplicateSeat {
                            seat_id: seat.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { venue, index })
    }

    /// The underlying venue document
    #[must_use]
    pub const fn venue(&self) -> &Venue {
        &self.venue
    }

    /// Find a seat and its enclosing section and row
    #[must_use]
    pub fn locate(&self, seat_id: &SeatId) -> Option<SeatRef<'_>> {
        let path = self.index.get(seat_id)?;
        let section = self.venue.sections.get(path.section)?;
        let row = section.rows.get(path.row)?;
        let seat = row.seats.get(path.seat)?;
        Some(SeatRef { section, row, seat })
    }

    /// Whether the catalog has a seat with this id
    #[must_use]
    pub fn contains(&self, seat_id: &SeatId) -> bool {
        self.index.contains_key(seat_id)
    }

    /// Number of seats
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the venue has no seats
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Parse a venue document from JSON bytes
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if the bytes are not a venue document.
pub fn parse_venue(bytes: &[u8]) -> Result<Venue, CatalogError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Where the venue document comes from
///
/// Returns `BoxFuture` instead of using `async fn` so the trait stays
/// dyn-compatible.
pub trait VenueSource: Send + Sync {
    /// Fetch and parse the venue document
    fn fetch(&self) -> BoxFuture<'_, Result<Venue, CatalogError>>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Fetch a venue document and build the catalog
///
/// # Errors
///
/// Returns whatever the source or [`Catalog::new`] reports.
#[tracing::instrument(skip_all, fields(source = %source.describe()))]
pub async fn load_catalog(source: &dyn VenueSource) -> Result<Catalog, CatalogError> {
    let venue = source.fetch().await?;
    let catalog = Catalog::new(venue)?;
    tracing::info!(
        venue = %catalog.venue().name,
        sections = catalog.venue().sections.len(),
        seats = catalog.len(),
        "Venue catalog loaded"
    );
    Ok(catalog)
}

/// Venue document read from a local JSON file
#[derive(Clone, Debug)]
pub struct FileVenueSource {
    path: PathBuf,
}

impl FileVenueSource {
    /// Read from `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VenueSource for FileVenueSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Venue, CatalogError>> {
        Box::pin(async move {
            let bytes = tokio::fs::read(&self.path)
                .await
                .map_err(|source| CatalogError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            parse_venue(&bytes)
        })
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Venue document fetched over HTTP
#[derive(Clone, Debug)]
pub struct HttpVenueSource {
    client: reqwest::Client,
    url: String,
}

impl HttpVenueSource {
    /// Fetch from `url`, giving up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl VenueSource for HttpVenueSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Venue, CatalogError>> {
        Box::pin(async move {
            let response = self.client.get(&self.url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status {
                    url: self.url.clone(),
                    status: status.as_u16(),
                });
            }
            let bytes = response.bytes().await?;
            parse_venue(&bytes)
        })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a location: `http(s)://` URLs are fetched, anything else
/// is a file path
///
/// # Errors
///
/// Returns [`CatalogError::Http`] if an HTTP client cannot be built.
pub fn source_for(location: &str, timeout: Duration) -> Result<Box<dyn VenueSource>, CatalogError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpVenueSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileVenueSource::new(location)))
    }
}
