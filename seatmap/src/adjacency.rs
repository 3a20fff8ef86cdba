//! Adjacent seat search
//!
//! Finds runs of `N` seats that sit side by side in one row. Within a row, the
//! available seats are taken in column order and every window of `N` of them
//! is a candidate; a window qualifies only when each seat's column is exactly
//! one more than the previous seat's. An unavailable seat between two available
//! ones therefore breaks the run: `[3, 5]` is not adjacent.
//!
//! Runs never cross row or section boundaries. [`AdjacentRuns`] yields
//! candidates lazily in catalog order (sections, then rows, then ascending
//! starting column); a [`RunPolicy`] picks one.

use crate::selection::{MAX_SELECTION, SelectedSeat};
use crate::venue::{Row, Seat, SeatRef, Section, Venue};

/// Smallest run length the search accepts
pub const MIN_RUN_LENGTH: usize = 1;

/// Largest run length the search accepts
pub const MAX_RUN_LENGTH: usize = MAX_SELECTION;

/// A qualifying run of adjacent available seats within one row
#[derive(Clone, Debug)]
pub struct SeatRun<'a> {
    /// Enclosing section
    pub section: &'a Section,
    /// Enclosing row
    pub row: &'a Row,
    /// Seats in ascending column order
    pub seats: Vec<&'a Seat>,
}

impl SeatRun<'_> {
    /// Column of the first seat
    #[must_use]
    pub fn first_col(&self) -> Option<i32> {
        self.seats.first().map(|s| s.col)
    }

    /// Project the run into selection entries
    #[must_use]
    pub fn to_selection(&self) -> Vec<SelectedSeat> {
        self.seats
            .iter()
            .map(|seat| {
                SelectedSeat::from(SeatRef {
                    section: self.section,
                    row: self.row,
                    seat,
                })
            })
            .collect()
    }
}

struct RowWindows<'a> {
    section: &'a Section,
    row: &'a Row,
    available: Vec<&'a Seat>,
    next_start: usize,
}

impl<'a> RowWindows<'a> {
    fn new(section: &'a Section, row: &'a Row) -> Self {
        Self {
            section,
            row,
            available: row.seats.iter().filter(|s| s.status.is_available()).collect(),
            next_start: 0,
        }
    }

    fn next_run(&mut self, run_length: usize) -> Option<SeatRun<'a>> {
        while self.next_start + run_length <= self.available.len() {
            let start = self.next_start;
            self.next_start += 1;
            let window = &self.available[start..start + run_length];
            if is_contiguous(window) {
                return Some(SeatRun {
                    section: self.section,
                    row: self.row,
                    seats: window.to_vec(),
                });
            }
        }
        None
    }
}

fn is_contiguous(window: &[&Seat]) -> bool {
    window
        .windows(2)
        .all(|pair| pair[1].col.checked_sub(pair[0].col) == Some(1))
}

/// Lazy iterator over every qualifying run in catalog order
///
/// Yields nothing for a run length outside
/// [`MIN_RUN_LENGTH`]`..=`[`MAX_RUN_LENGTH`].
pub struct AdjacentRuns<'a> {
    run_length: usize,
    rows: Box<dyn Iterator<Item = (&'a Section, &'a Row)> + 'a>,
    current: Option<RowWindows<'a>>,
}

impl<'a> AdjacentRuns<'a> {
    /// Search `venue` for runs of `run_length` seats
    #[must_use]
    pub fn new(venue: &'a Venue, run_length: usize) -> Self {
        let rows: Box<dyn Iterator<Item = (&'a Section, &'a Row)> + 'a> =
            if is_valid_run_length(run_length) {
                Box::new(
                    venue
                        .sections
                        .iter()
                        .flat_map(|section| section.rows.iter().map(move |row| (section, row))),
                )
            } else {
                Box::new(std::iter::empty())
            };
        Self {
            run_length,
            rows,
            current: None,
        }
    }

    /// The run length being searched for
    #[must_use]
    pub const fn run_length(&self) -> usize {
        self.run_length
    }
}

impl<'a> Iterator for AdjacentRuns<'a> {
    type Item = SeatRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(run) = self
                .current
                .as_mut()
                .and_then(|windows| windows.next_run(self.run_length))
            {
                return Some(run);
            }
            let (section, row) = self.rows.next()?;
            self.current = Some(RowWindows::new(section, row));
        }
    }
}

impl std::fmt::Debug for AdjacentRuns<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdjacentRuns")
            .field("run_length", &self.run_length)
            .finish_non_exhaustive()
    }
}

/// Whether the search accepts `run_length`
#[must_use]
pub const fn is_valid_run_length(run_length: usize) -> bool {
    run_length >= MIN_RUN_LENGTH && run_length <= MAX_RUN_LENGTH
}

/// Chooses one run out of the candidates
pub trait RunPolicy: Send + Sync {
    /// Pick a run, or `None` if no candidate is acceptable
    fn choose<'a>(&self, runs: AdjacentRuns<'a>) -> Option<SeatRun<'a>>;
}

/// Take the first qualifying run in catalog order
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstFit;

impl RunPolicy for FirstFit {
    fn choose<'a>(&self, mut runs: AdjacentRuns<'a>) -> Option<SeatRun<'a>> {
        runs.next()
    }
}

/// Find `run_length` adjacent available seats using `policy`
#[must_use]
pub fn find_adjacent(
    venue: &Venue,
    run_length: usize,
    policy: &dyn RunPolicy,
) -> Option<Vec<SelectedSeat>> {
    let run = policy.choose(AdjacentRuns::new(venue, run_length))?;
    tracing::debug!(
        section = %run.section.id,
        row = run.row.index,
        first_col = ?run.first_col(),
        run_length,
        "Adjacent run found"
    );
    Some(run.to_selection())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::SeatStatus;

    fn row(index: i32, available_cols: &[i32], max_col: i32) -> Row {
        let seats = (1..=max_col)
            .map(|col| {
                let status = if available_cols.contains(&col) {
                    SeatStatus::Available
                } else {
                    SeatStatus::Sold
                };
                Seat::new(format!("R{index}-{col}"), col, 2, status)
            })
            .collect();
        Row::new(index, seats)
    }

    fn venue(rows: Vec<Row>) -> Venue {
        Venue::new("Hall", vec![Section::new("A", "Section A", rows)])
    }

    fn cols(seats: &[SelectedSeat]) -> Vec<i32> {
        seats.iter().map(|s| s.seat.col).collect()
    }

    #[test]
    fn finds_first_contiguous_window() {
        let venue = venue(vec![row(1, &[3, 4, 5, 7, 8], 8)]);
        let found = find_adjacent(&venue, 3, &FirstFit);
        assert_eq!(found.as_deref().map(cols), Some(vec![3, 4, 5]));
    }

    #[test]
    fn gap_in_columns_breaks_the_run() {
        let venue = venue(vec![row(1, &[1, 3, 5], 5)]);
        assert!(find_adjacent(&venue, 2, &FirstFit).is_none());
    }

    #[test]
    fn unavailable_seat_between_breaks_the_run() {
        // Column 4 is held, so 3 and 5 are neighbours only in the filtered list
        let venue = venue(vec![row(1, &[3, 5], 6)]);
        assert!(find_adjacent(&venue, 2, &FirstFit).is_none());
    }

    #[test]
    fn runs_do_not_cross_rows() {
        let venue = venue(vec![row(1, &[7, 8], 8), row(2, &[1], 8)]);
        assert!(find_adjacent(&venue, 3, &FirstFit).is_none());
    }

    #[test]
    fn later_row_is_used_when_earlier_rows_fail() {
        let venue = venue(vec![row(1, &[1, 3], 4), row(2, &[2, 3], 4)]);
        let found = find_adjacent(&venue, 2, &FirstFit).unwrap_or_default();
        assert_eq!(found[0].row_index, 2);
        assert_eq!(cols(&found), [2, 3]);
        assert_eq!(found[0].section_label, "Section A");
    }

    #[test]
    fn catalog_order_beats_numeric_order() {
        let sections = Venue::new(
            "Hall",
            vec![
                Section::new("Z", "Section Z", vec![row(9, &[4, 5], 6)]),
                Section::new("A", "Section A", vec![row(1, &[1, 2], 6)]),
            ],
        );
        let found = find_adjacent(&sections, 2, &FirstFit).unwrap_or_default();
        assert_eq!(found[0].section_id, "Z");
        assert_eq!(found[0].row_index, 9);
        assert_eq!(cols(&found), [4, 5]);

        // Rows too: a higher-numbered row listed first wins
        let rows = venue(vec![row(5, &[2, 3], 4), row(2, &[1, 2], 4)]);
        let found = find_adjacent(&rows, 2, &FirstFit).unwrap_or_default();
        assert_eq!(found[0].row_index, 5);
        assert_eq!(cols(&found), [2, 3]);
    }

    #[test]
    fn iterator_yields_every_window_in_order() {
        let venue = venue(vec![row(1, &[1, 2, 3], 3), row(2, &[4, 5], 5)]);
        let starts: Vec<_> = AdjacentRuns::new(&venue, 2)
            .map(|run| (run.row.index, run.first_col()))
            .collect();
        assert_eq!(starts, [(1, Some(1)), (1, Some(2)), (2, Some(4))]);
    }

    #[test]
    fn single_seat_run_is_any_available_seat() {
        let venue = venue(vec![row(1, &[4], 6)]);
        let found = find_adjacent(&venue, 1, &FirstFit).unwrap_or_default();
        assert_eq!(cols(&found), [4]);
    }

    #[test]
    fn out_of_range_lengths_find_nothing() {
        let venue = venue(vec![row(1, &(1..=12).collect::<Vec<_>>(), 12)]);
        assert!(find_adjacent(&venue, 0, &FirstFit).is_none());
        assert!(find_adjacent(&venue, MAX_RUN_LENGTH + 1, &FirstFit).is_none());
        assert_eq!(
            find_adjacent(&venue, MAX_RUN_LENGTH, &FirstFit).map(|s| s.len()),
            Some(MAX_RUN_LENGTH)
        );
    }

    #[test]
    fn policy_can_prefer_a_later_run() {
        struct LastFit;
        impl RunPolicy for LastFit {
            fn choose<'a>(&self, runs: AdjacentRuns<'a>) -> Option<SeatRun<'a>> {
                runs.last()
            }
        }

        let venue = venue(vec![row(1, &[1, 2, 5, 6], 6)]);
        let found = find_adjacent(&venue, 2, &LastFit).unwrap_or_default();
        assert_eq!(cols(&found), [5, 6]);
    }
}
