//! Projection of progress onto filled/empty cells.

use crate::calculator::YearProgress;
use serde::{Deserialize, Serialize};

/// Glyph for an elapsed block.
pub const BLOCK_FILLED: char = '▓';
/// Glyph for a remaining block.
pub const BLOCK_EMPTY: char = '░';

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Filled,
    Empty,
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Filled)
    }
}

/// Unit represented by one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One cell per day.
    #[default]
    Days,
    /// One cell per week.
    Weeks,
    /// No grid.
    None,
}

impl Granularity {
    /// Next granularity in display order.
    pub fn next(self) -> Self {
        match self {
            Self::Days => Self::Weeks,
            Self::Weeks => Self::None,
            Self::None => Self::Days,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Days => "Days",
            Self::Weeks => "Weeks",
            Self::None => "None",
        }
    }
}

/// Build `total` cells where the first `passed` are filled.
pub fn project(passed: u32, total: u32) -> Vec<Cell> {
    (0..total)
        .map(|i| if i < passed { Cell::Filled } else { Cell::Empty })
        .collect()
}

/// Render `blocks` glyphs with the elapsed share filled.
///
/// With 100 blocks, each block is one whole percent.
pub fn block_bar(percentage: f64, blocks: usize) -> String {
    let filled = filled_blocks(percentage, blocks);

    let mut bar = String::with_capacity(blocks * BLOCK_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BLOCK_FILLED).take(filled));
    bar.extend(std::iter::repeat(BLOCK_EMPTY).take(blocks - filled));
    bar
}

/// `floor(percentage) * blocks / 100`, without overflowing for large `blocks`.
fn filled_blocks(percentage: f64, blocks: usize) -> usize {
    let whole_percent = percentage.clamp(0.0, 100.0).floor() as usize;
    let filled = blocks / 100 * whole_percent + blocks % 100 * whole_percent / 100;
    filled.min(blocks)
}

impl YearProgress {
    /// Cells for the chosen granularity.
    pub fn grid(&self, granularity: Granularity) -> Vec<Cell> {
        match granularity {
            Granularity::Days => project(self.day_of_year, self.total_days_in_year),
            Granularity::Weeks => project(self.weeks_passed(), self.total_weeks()),
            Granularity::None => Vec::new(),
        }
    }

    /// Block bar for this progress.
    pub fn block_bar(&self, blocks: usize) -> String {
        block_bar(self.percentage, blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[test]
    fn test_day_grid() {
        let cells = project(100, 365);
        assert_eq!(cells.len(), 365);
        assert!(cells[..100].iter().all(|c| c.is_filled()));
        assert!(cells[100..].iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn test_passed_beyond_total() {
        let cells = project(10, 3);
        assert_eq!(cells, vec![Cell::Filled; 3]);
        assert!(project(0, 0).is_empty());
    }

    #[test]
    fn test_week_grid() {
        let at = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let progress = YearProgress::at(at);
        let weeks = progress.grid(Granularity::Weeks);

        assert_eq!(weeks.len(), 53);
        assert!(weeks.iter().all(|c| c.is_filled()));
        assert!(progress.grid(Granularity::None).is_empty());
        assert_eq!(progress.grid(Granularity::Days).len(), 366);
    }

    #[test]
    fn test_block_bar() {
        let bar = block_bar(49.99, 100);
        assert_eq!(bar.chars().count(), 100);
        assert_eq!(bar.chars().filter(|c| *c == BLOCK_FILLED).count(), 49);

        assert_eq!(block_bar(0.0, 4), "░░░░");
        assert_eq!(block_bar(99.9, 10), "▓▓▓▓▓▓▓▓▓░");
        assert_eq!(block_bar(50.0, 10), "▓▓▓▓▓░░░░░");
    }

    #[test]
    fn test_filled_blocks_large_count() {
        assert_eq!(filled_blocks(100.0, usize::MAX), usize::MAX);
        assert_eq!(filled_blocks(50.0, usize::MAX), usize::MAX / 2);
        assert_eq!(filled_blocks(0.0, usize::MAX), 0);
        assert_eq!(filled_blocks(150.0, 7), 7);
        assert_eq!(filled_blocks(-3.0, 7), 0);
        assert_eq!(filled_blocks(f64::NAN, 7), 0);
    }

    #[test]
    fn test_granularity_cycle() {
        assert_eq!(Granularity::Days.next(), Granularity::Weeks);
        assert_eq!(Granularity::Weeks.next(), Granularity::None);
        assert_eq!(Granularity::None.next(), Granularity::Days);
    }

    proptest! {
        #[test]
        fn prop_filled_prefix(passed in 0u32..400, total in 0u32..400) {
            let cells = project(passed, total);
            prop_assert_eq!(cells.len(), total as usize);
            for (i, cell) in cells.iter().enumerate() {
                prop_assert_eq!(cell.is_filled(), (i as u32) < passed);
            }
        }
    }
}
