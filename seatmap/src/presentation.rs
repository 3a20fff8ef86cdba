//! Presentation mapping
//!
//! Pure functions from seats and selection state to what a renderer draws:
//! fill color, outline, accessible label, summary lines and seat details.
//! Nothing here mutates state.
//!
//! Fill precedence, highest first:
//!
//! 1. heat-map on and seat available: the price tier color
//! 2. seat selected: [`SELECTED_COLOR`]
//! 3. otherwise: the status color
//!
//! The heat-map wins over selection, so a selected available seat shows its
//! tier color while the heat-map is on.

use crate::pricing::{Price, PriceTable, Subtotal};
use crate::selection::{MAX_SELECTION, SelectedSeat, SelectionState};
use crate::venue::{PriceTier, Seat, SeatRef, SeatStatus};
use std::fmt;

/// Fill for selected seats
pub const SELECTED_COLOR: &str = "#10b981";

/// Fill for tiers the heat-map does not know
pub const UNKNOWN_TIER_COLOR: &str = "#6b7280";

/// Outline of the focused seat
pub const FOCUS_STROKE: SeatStroke = SeatStroke {
    color: "#ffffff",
    width: 3,
};

/// Outline of every other seat
pub const DEFAULT_STROKE: SeatStroke = SeatStroke {
    color: "#1f2937",
    width: 1,
};

/// Shown when the selection is empty
pub const EMPTY_SELECTION_MESSAGE: &str =
    "No seats selected. Click on available seats to select them.";

/// Shown when nothing is focused
pub const NO_FOCUS_MESSAGE: &str = "Click or hover over a seat to view details";

/// Fill color for a seat status
#[must_use]
pub const fn status_color(status: SeatStatus) -> &'static str {
    match status {
        SeatStatus::Available => "#3b82f6",
        SeatStatus::Reserved => "#f59e0b",
        SeatStatus::Held => "#8b5cf6",
        SeatStatus::Sold | SeatStatus::Unknown => "#6b7280",
    }
}

/// Heat-map fill for a price tier
#[must_use]
pub const fn tier_color(tier: PriceTier) -> &'static str {
    match tier.0 {
        1 => "#ef4444",
        2 => "#f97316",
        3 => "#eab308",
        4 => "#22c55e",
        _ => UNKNOWN_TIER_COLOR,
    }
}

/// Fill color for a seat
#[must_use]
pub const fn seat_color(seat: &Seat, selected: bool, heat_map: bool) -> &'static str {
    if heat_map && seat.status.is_available() {
        tier_color(seat.price_tier)
    } else if selected {
        SELECTED_COLOR
    } else {
        status_color(seat.status)
    }
}

/// Seat outline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatStroke {
    /// Outline color
    pub color: &'static str,
    /// Outline width in pixels
    pub width: u8,
}

/// Outline for a seat; depends only on focus
#[must_use]
pub const fn seat_stroke(focused: bool) -> SeatStroke {
    if focused { FOCUS_STROKE } else { DEFAULT_STROKE }
}

/// Accessible label for a seat on the map
///
/// `"Lower A, Row 3, Seat 12, Price $100, available, currently selected"`
#[must_use]
pub fn seat_label(found: &SeatRef<'_>, price: Price, selected: bool) -> String {
    let mut label = format!(
        "{}, Row {}, Seat {}, Price ${price}, {}",
        found.section.label, found.row.index, found.seat.col, found.seat.status
    );
    if selected {
        label.push_str(", currently selected");
    }
    label
}

/// Everything a renderer needs to draw one seat
#[derive(Clone, Debug, PartialEq)]
pub struct SeatAppearance {
    /// Fill color
    pub fill: &'static str,
    /// Outline
    pub stroke: SeatStroke,
    /// Focused and available seats get a glow
    pub glow: bool,
    /// Only available seats react to input
    pub interactive: bool,
    /// Toggle state for assistive technology; `None` for non-interactive seats
    pub pressed: Option<bool>,
    /// Center in map coordinates
    pub position: (f64, f64),
    /// Accessible label
    pub label: String,
}

/// Derive the appearance of a catalog seat
#[must_use]
pub fn appearance(
    found: &SeatRef<'_>,
    selection: &SelectionState,
    heat_map: bool,
    prices: &PriceTable,
) -> SeatAppearance {
    let seat = found.seat;
    let selected = selection.contains(&seat.id);
    let focused = selection.is_focused(&seat.id);
    let interactive = seat.status.is_available();

    SeatAppearance {
        fill: seat_color(seat, selected, heat_map),
        stroke: seat_stroke(focused),
        glow: focused && interactive,
        interactive,
        pressed: interactive.then_some(selected),
        position: found.map_position(),
        label: seat_label(found, prices.price_of(seat.price_tier), selected),
    }
}

/// `"3/8"`
#[must_use]
pub fn count_label(count: usize) -> String {
    format!("{count}/{MAX_SELECTION}")
}

/// `"Selected Seats (3/8)"`
#[must_use]
pub fn summary_heading(count: usize) -> String {
    format!("Selected Seats ({})", count_label(count))
}

/// Notice shown while the selection is full, `None` otherwise
#[must_use]
pub fn capacity_notice(selection: &SelectionState) -> Option<String> {
    selection
        .is_full()
        .then(|| format!("Maximum seats selected ({})", count_label(selection.len())))
}

/// One entry in the selection summary
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryLine {
    /// Seat id, for removal
    pub seat_id: String,
    /// Section label
    pub section: String,
    /// `"Row 3, Seat 12"`
    pub position: String,
    /// Seat price
    pub price: Price,
}

impl From<(&SelectedSeat, &PriceTable)> for SummaryLine {
    fn from((seat, prices): (&SelectedSeat, &PriceTable)) -> Self {
        Self {
            seat_id: seat.id().to_string(),
            section: seat.section_label.clone(),
            position: format!("Row {}, Seat {}", seat.row_index, seat.seat.col),
            price: prices.price_of(seat.seat.price_tier),
        }
    }
}

/// The selection summary panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSummary {
    /// `"Selected Seats (n/8)"`
    pub heading: String,
    /// One line per seat in selection order
    pub lines: Vec<SummaryLine>,
    /// Sum of line prices
    pub subtotal: Subtotal,
    /// Present while the selection is full
    pub capacity_notice: Option<String>,
}

impl SelectionSummary {
    /// Build the summary for a selection
    #[must_use]
    pub fn new(selection: &SelectionState, prices: &PriceTable) -> Self {
        Self {
            heading: summary_heading(selection.len()),
            lines: selection
                .seats()
                .iter()
                .map(|seat| SummaryLine::from((seat, prices)))
                .collect(),
            subtotal: selection.subtotal(prices),
            capacity_notice: capacity_notice(selection),
        }
    }

    /// Whether the summary lists no seats
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        if self.lines.is_empty() {
            return writeln!(f, "{EMPTY_SELECTION_MESSAGE}");
        }
        for line in &self.lines {
            writeln!(f, "  {}: {}  ${}", line.section, line.position, line.price)?;
        }
        writeln!(f, "Subtotal: ${}", self.subtotal)?;
        if let Some(notice) = &self.capacity_notice {
            writeln!(f, "{notice}")?;
        }
        Ok(())
    }
}

/// The seat details panel for the focused seat
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatDetails {
    /// Section label
    pub section: String,
    /// Row index
    pub row: i32,
    /// Seat column
    pub seat: i32,
    /// Seat price
    pub price: Price,
    /// Status with a leading capital, e.g. `"Available"`
    pub status: String,
    /// Seat id
    pub seat_id: String,
}

impl SeatDetails {
    /// Details for a focused seat
    #[must_use]
    pub fn new(seat: &SelectedSeat, prices: &PriceTable) -> Self {
        Self {
            section: seat.section_label.clone(),
            row: seat.row_index,
            seat: seat.seat.col,
            price: prices.price_of(seat.seat.price_tier),
            status: capitalize(seat.seat.status.as_str()),
            seat_id: seat.id().to_string(),
        }
    }
}

impl fmt::Display for SeatDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Section: {}", self.section)?;
        writeln!(f, "Row:     {}", self.row)?;
        writeln!(f, "Seat:    {}", self.seat)?;
        writeln!(f, "Price:   ${}", self.price)?;
        writeln!(f, "Status:  {}", self.status)?;
        writeln!(f, "Seat ID: {}", self.seat_id)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// One swatch in a legend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    /// Swatch color
    pub color: &'static str,
    /// Swatch caption
    pub label: String,
}

/// Legend for the normal view: status colors plus the selected color
#[must_use]
pub fn status_legend() -> Vec<LegendEntry> {
    let entry = |color, label: &str| LegendEntry {
        color,
        label: label.to_string(),
    };
    vec![
        entry(status_color(SeatStatus::Available), "Available"),
        entry(SELECTED_COLOR, "Selected"),
        entry(status_color(SeatStatus::Reserved), "Reserved"),
        entry(status_color(SeatStatus::Sold), "Sold"),
        entry(status_color(SeatStatus::Held), "Held"),
    ]
}

/// Legend for the heat-map: one swatch per priced tier
#[must_use]
pub fn heat_map_legend(prices: &PriceTable) -> Vec<LegendEntry> {
    prices
        .iter()
        .map(|(tier, price)| LegendEntry {
            color: tier_color(tier),
            label: format!("${price} (Tier {tier})"),
        })
        .collect()
}
