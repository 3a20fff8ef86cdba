//! Venue data model
//!
//! The venue document is the seat catalog: sections contain rows, rows contain
//! seats. The document is immutable for the lifetime of a session; seat status
//! is whatever the document said when it was loaded.
//!
//! Wire format is camelCase JSON:
//!
//! ```json
//! {
//!   "venueId": "arena-1",
//!   "name": "Main Arena",
//!   "map": { "width": 1024, "height": 768 },
//!   "sections": [{
//!     "id": "A",
//!     "label": "Lower Bowl A",
//!     "transform": { "x": 0, "y": 0, "scale": 1 },
//!     "rows": [{
//!       "index": 1,
//!       "seats": [{ "id": "A-1-01", "col": 1, "x": 50, "y": 40, "priceTier": 1, "status": "available" }]
//!     }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique seat identifier across the whole venue
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl SeatId {
    /// Create a seat identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SeatId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Price category of a seat
///
/// Tiers map to prices through a [`crate::pricing::PriceTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTier(pub u8);

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seat status as published by the venue document
///
/// Only `Available` seats can be selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Seat can be selected
    Available,
    /// Seat is reserved
    Reserved,
    /// Seat has been sold
    Sold,
    /// Seat is temporarily held
    Held,
    /// Status string the engine does not recognize
    #[serde(other)]
    Unknown,
}

impl SeatStatus {
    /// Whether a seat with this status can be selected
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, SeatStatus::Available)
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Reserved => "reserved",
            SeatStatus::Sold => "sold",
            SeatStatus::Held => "held",
            SeatStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single seat
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    /// Unique identifier
    pub id: SeatId,
    /// Column position within the row; adjacent seats differ by exactly one
    pub col: i32,
    /// Horizontal position in section coordinates
    pub x: f64,
    /// Vertical position in section coordinates
    pub y: f64,
    /// Price category
    pub price_tier: PriceTier,
    /// Status at load time
    pub status: SeatStatus,
}

impl Seat {
    /// Create a seat at the origin
    #[must_use]
    pub fn new(id: impl Into<SeatId>, col: i32, price_tier: u8, status: SeatStatus) -> Self {
        Self {
            id: id.into(),
            col,
            x: 0.0,
            y: 0.0,
            price_tier: PriceTier(price_tier),
            status,
        }
    }

    /// Place the seat at the given section coordinates
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// A row of seats, ordered by ascending column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Row number within its section
    pub index: i32,
    /// Seats in ascending column order
    pub seats: Vec<Seat>,
}

impl Row {
    /// Create a row
    #[must_use]
    pub const fn new(index: i32, seats: Vec<Seat>) -> Self {
        Self { index, seats }
    }
}

/// Placement of a section on the map
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionTransform {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
    /// Uniform scale factor
    pub scale: f64,
}

impl Default for SectionTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl SectionTransform {
    /// Map section coordinates to map coordinates
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x.mul_add(self.scale, self.x), y.mul_add(self.scale, self.y))
    }
}

/// A named block of rows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section identifier
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Placement on the map
    #[serde(default)]
    pub transform: SectionTransform,
    /// Rows in catalog order
    pub rows: Vec<Row>,
}

impl Section {
    /// Create a section with the identity transform
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            transform: SectionTransform::default(),
            rows,
        }
    }

    /// Replace the section's placement
    #[must_use]
    pub fn with_transform(mut self, transform: SectionTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// Map canvas size
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
}

impl Default for MapSize {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// The venue document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    /// Optional external identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
    /// Display name
    pub name: String,
    /// Canvas size
    #[serde(default)]
    pub map: MapSize,
    /// Sections in catalog order
    pub sections: Vec<Section>,
}

impl Venue {
    /// Create a venue with a default-sized map
    #[must_use]
    pub fn new(name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            venue_id: None,
            name: name.into(),
            map: MapSize::default(),
            sections,
        }
    }

    /// Total number of seats
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| &section.rows)
            .map(|row| row.seats.len())
            .sum()
    }

    /// Every seat with its enclosing section and row, in catalog order
    pub fn seats(&self) -> impl Iterator<Item = SeatRef<'_>> {
        self.sections.iter().flat_map(|section| {
            section.rows.iter().flat_map(move |row| {
                row.seats.iter().map(move |seat| SeatRef { section, row, seat })
            })
        })
    }
}

/// A seat together with the section and row that contain it
#[derive(Clone, Copy, Debug)]
pub struct SeatRef<'a> {
    /// Enclosing section
    pub section: &'a Section,
    /// Enclosing row
    pub row: &'a Row,
    /// The seat itself
    pub seat: &'a Seat,
}

impl SeatRef<'_> {
    /// Position of the seat in map coordinates
    #[must_use]
    pub fn map_position(&self) -> (f64, f64) {
        self.section.transform.apply(self.seat.x, self.seat.y)
    }
}
