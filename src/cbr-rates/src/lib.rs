#![deny(missing_docs)]

//! Aggregates the daily exchange rates published by the Central Bank of the
//! Russian Federation over a window of days. For every currency the crate
//! reports the lowest and highest rate per unit, the dates they were recorded
//! at, and the average amount of the currency one rouble bought.

/// Per-currency accumulators and the engine that folds daily snapshots into them.
pub mod aggregation;
/// Configuration of the window and the fetcher.
pub mod config;
/// Error types.
pub mod errors;
/// Retrieval of raw documents.
pub mod http;
/// Conversion of quoted values into comparable unit rates.
pub mod normalize;
/// Daily rates sources and their document parsers.
pub mod source;
/// The data model shared by the parser and the engine.
pub mod types;
mod utils;
/// Drives fetch, parse and fold over a window of dates.
pub mod window;

pub use aggregation::{
    fold_snapshot, AccumulatorSet, AccumulatorSummary, AggregationEngine, CurrencyAccumulator,
    FoldReport, SkippedObservation,
};
pub use config::{FetcherConfig, WindowConfig, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
pub use errors::{FetchError, ObservationError, ParseError, SnapshotError};
pub use http::{Fetcher, HttpFetcher};
pub use source::{CentralBankOfRussia, IsSource, SnapshotParser};
pub use types::{CurrencyCode, CurrencyObservation, Snapshot};
pub use utils::window_dates;
pub use window::{load_snapshot, run_window, DayOutcome, WindowSummary};
