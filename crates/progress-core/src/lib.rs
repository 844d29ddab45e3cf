//! # progress-core
//!
//! Core logic for the Year Progress widget.
//!
//! ## Features
//!
//! - Leap-year aware progress calculation for an explicit instant
//! - Day and week grid projection for visual display
//! - Cancellable periodic refresh loop on tokio
//! - Key-value settings storage with fallback to defaults

mod calculator;
mod clock;
mod grid;
mod notes;
mod refresh;
mod store;

pub use calculator::{days_in_year, is_leap_year, YearProgress, MS_PER_DAY};
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use grid::{block_bar, project, Cell, Granularity, BLOCK_EMPTY, BLOCK_FILLED};
pub use notes::NoteList;
pub use refresh::{Cadence, RefreshHandle, RefreshLoop};
pub use store::{
    MemoryStore, Settings, SettingsStore, SqliteStore, StoreError, StoreResult, KEY_DARK_MODE,
    KEY_NOTES,
};
