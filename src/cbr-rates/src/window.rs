use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::aggregation::{AccumulatorSummary, AggregationEngine, FoldReport};
use crate::config::WindowConfig;
use crate::errors::SnapshotError;
use crate::http::Fetcher;
use crate::source::SnapshotParser;
use crate::types::{CurrencyCode, Snapshot};
use crate::utils::window_dates;

/// What happened to one requested date.
#[derive(Debug)]
pub enum DayOutcome {
    /// The document was folded into the accumulators.
    Folded {
        /// The requested date.
        requested: NaiveDate,
        /// The date the document carries.
        snapshot_date: NaiveDate,
        /// What the fold did.
        report: FoldReport,
    },
    /// The date contributed nothing.
    Skipped {
        /// The requested date.
        requested: NaiveDate,
        /// Why the date was skipped.
        error: SnapshotError,
    },
}

impl DayOutcome {
    /// The requested date.
    pub fn requested(&self) -> NaiveDate {
        match self {
            DayOutcome::Folded { requested, .. } | DayOutcome::Skipped { requested, .. } => {
                *requested
            }
        }
    }

    /// Returns true if the date made it into the accumulators.
    pub fn is_folded(&self) -> bool {
        matches!(self, DayOutcome::Folded { .. })
    }
}

/// The result of a completed window run.
#[derive(Debug)]
pub struct WindowSummary {
    /// The final statistics per currency, empty if no date could be processed.
    pub results: BTreeMap<CurrencyCode, AccumulatorSummary>,
    /// One entry per requested date, newest first.
    pub days: Vec<DayOutcome>,
}

impl WindowSummary {
    /// The number of dates that were folded.
    pub fn folded_days(&self) -> usize {
        self.days.iter().filter(|day| day.is_folded()).count()
    }
}

/// Retrieves and parses the document for one date.
pub async fn load_snapshot<F, P>(
    fetcher: &F,
    parser: &P,
    date: NaiveDate,
) -> Result<Snapshot, SnapshotError>
where
    F: Fetcher + ?Sized,
    P: SnapshotParser + ?Sized,
{
    let bytes = fetcher.fetch(date).await?;
    Ok(parser.parse(&bytes)?)
}

/// Walks the window from the newest date backwards, one date at a time, and
/// folds every document that can be retrieved and parsed.
///
/// A date whose document cannot be fetched or parsed is logged and skipped;
/// the run always completes with whatever could be aggregated.
pub async fn run_window<F, P>(fetcher: &F, parser: &P, config: &WindowConfig) -> WindowSummary
where
    F: Fetcher + ?Sized,
    P: SnapshotParser + ?Sized,
{
    let mut engine = AggregationEngine::new();
    let mut seen_dates = HashSet::new();
    let mut days = Vec::new();

    for requested in window_dates(config.end_date(), config.days) {
        let outcome = match load_snapshot(fetcher, parser, requested).await {
            Ok(snapshot) if config.dedupe_snapshots && !seen_dates.insert(snapshot.date) => {
                DayOutcome::Skipped {
                    requested,
                    error: SnapshotError::Repeated {
                        date: snapshot.date,
                    },
                }
            }
            Ok(snapshot) => {
                let report = engine.fold(&snapshot);
                info!(
                    %requested,
                    snapshot_date = %snapshot.date,
                    accepted = report.accepted(),
                    skipped = report.skipped.len(),
                    "folded snapshot"
                );
                DayOutcome::Folded {
                    requested,
                    snapshot_date: snapshot.date,
                    report,
                }
            }
            Err(error) => DayOutcome::Skipped { requested, error },
        };

        if let DayOutcome::Skipped { requested, error } = &outcome {
            warn!(%requested, %error, "skipping date");
        }
        days.push(outcome);
    }

    WindowSummary {
        results: engine.results(),
        days,
    }
}
