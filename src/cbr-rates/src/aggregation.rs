use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::errors::ObservationError;
use crate::normalize::{normalize, overflow, NormalizedObservation};
use crate::types::{CurrencyCode, Snapshot};

#[cfg(test)]
mod tests;

/// The running statistics of one currency over the processed window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyAccumulator {
    code: CurrencyCode,
    max_unit_rate: Decimal,
    max_date: NaiveDate,
    min_unit_rate: Decimal,
    min_date: NaiveDate,
    sum_inverse_unit_rate: Decimal,
    observation_count: u64,
}

impl CurrencyAccumulator {
    /// Seeds an accumulator from the first observation of a currency.
    fn seed(observation: &NormalizedObservation, date: NaiveDate) -> Self {
        Self {
            code: observation.code.clone(),
            max_unit_rate: observation.unit_rate,
            max_date: date,
            min_unit_rate: observation.unit_rate,
            min_date: date,
            sum_inverse_unit_rate: observation.inverse_rate,
            observation_count: 1,
        }
    }

    /// Folds one more observation in. Ties keep the date recorded first.
    ///
    /// Returns `None` and leaves the accumulator untouched when the running sum
    /// of inverse rates would overflow.
    fn update(&mut self, observation: &NormalizedObservation, date: NaiveDate) -> Option<()> {
        let sum_inverse_unit_rate = self
            .sum_inverse_unit_rate
            .checked_add(observation.inverse_rate)?;
        if observation.unit_rate > self.max_unit_rate {
            self.max_unit_rate = observation.unit_rate;
            self.max_date = date;
        } else if observation.unit_rate < self.min_unit_rate {
            self.min_unit_rate = observation.unit_rate;
            self.min_date = date;
        }
        self.sum_inverse_unit_rate = sum_inverse_unit_rate;
        self.observation_count += 1;
        Some(())
    }

    /// The currency identity.
    pub fn code(&self) -> &CurrencyCode {
        &self.code
    }

    /// The highest unit rate and the date it was recorded at.
    pub fn max(&self) -> (Decimal, NaiveDate) {
        (self.max_unit_rate, self.max_date)
    }

    /// The lowest unit rate and the date it was recorded at.
    pub fn min(&self) -> (Decimal, NaiveDate) {
        (self.min_unit_rate, self.min_date)
    }

    /// The number of observations folded in.
    pub fn observation_count(&self) -> u64 {
        self.observation_count
    }

    /// The mean of nominal / value over all observations, i.e. how much foreign
    /// currency one domestic unit bought on average.
    pub fn average(&self) -> Decimal {
        self.sum_inverse_unit_rate / Decimal::from(self.observation_count)
    }

    /// Returns a read-only copy of the final statistics.
    pub fn summary(&self) -> AccumulatorSummary {
        AccumulatorSummary {
            code: self.code.clone(),
            max_unit_rate: self.max_unit_rate,
            max_date: self.max_date,
            min_unit_rate: self.min_unit_rate,
            min_date: self.min_date,
            average: self.average(),
            observations: self.observation_count,
        }
    }
}

/// The statistics of one currency as handed to a reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccumulatorSummary {
    /// The currency identity.
    pub code: CurrencyCode,
    /// The highest unit rate seen.
    pub max_unit_rate: Decimal,
    /// The date of [AccumulatorSummary::max_unit_rate].
    pub max_date: NaiveDate,
    /// The lowest unit rate seen.
    pub min_unit_rate: Decimal,
    /// The date of [AccumulatorSummary::min_unit_rate].
    pub min_date: NaiveDate,
    /// The mean of the inverse unit rates.
    pub average: Decimal,
    /// The number of observations aggregated.
    pub observations: u64,
}

/// The accumulators of a run, keyed by currency identity.
pub type AccumulatorSet = HashMap<CurrencyCode, CurrencyAccumulator>;

/// An observation that was left out of a fold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedObservation {
    /// The currency identity of the skipped observation.
    pub code: CurrencyCode,
    /// Why it was skipped.
    pub error: ObservationError,
}

/// What a single fold did to the accumulator set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FoldReport {
    /// Observations folded into an existing accumulator.
    pub updated: usize,
    /// Observations that created a new accumulator.
    pub created: usize,
    /// Observations rejected during normalization.
    pub skipped: Vec<SkippedObservation>,
}

impl FoldReport {
    /// The number of observations that made it into the accumulators.
    pub fn accepted(&self) -> usize {
        self.updated + self.created
    }
}

/// Folds one snapshot into the given accumulator set.
///
/// Observations are matched to accumulators by currency identity, never by
/// their position in the document. A currency seen for the first time gets a
/// new accumulator seeded at the snapshot date. If the same identity appears
/// more than once in a snapshot only its last occurrence is considered.
/// Observations that fail to normalize are skipped and listed in the report.
pub fn fold_snapshot(accumulators: &mut AccumulatorSet, snapshot: &Snapshot) -> FoldReport {
    let mut report = FoldReport::default();

    let mut last_positions: HashMap<&CurrencyCode, usize> = HashMap::new();
    for (position, observation) in snapshot.observations.iter().enumerate() {
        last_positions.insert(&observation.code, position);
    }

    for (position, observation) in snapshot.observations.iter().enumerate() {
        if last_positions.get(&observation.code) != Some(&position) {
            debug!(
                code = %observation.code,
                date = %snapshot.date,
                "duplicate observation superseded by a later one"
            );
            continue;
        }

        let normalized = match normalize(observation) {
            Ok(normalized) => normalized,
            Err(error) => {
                debug!(
                    code = %observation.code,
                    date = %snapshot.date,
                    %error,
                    "skipping observation"
                );
                report.skipped.push(SkippedObservation {
                    code: observation.code.clone(),
                    error,
                });
                continue;
            }
        };

        match accumulators.get_mut(&normalized.code) {
            Some(accumulator) => {
                if accumulator.update(&normalized, snapshot.date).is_some() {
                    report.updated += 1;
                } else {
                    let error = overflow(observation);
                    debug!(
                        code = %observation.code,
                        date = %snapshot.date,
                        %error,
                        "skipping observation"
                    );
                    report.skipped.push(SkippedObservation {
                        code: observation.code.clone(),
                        error,
                    });
                }
            }
            None => {
                accumulators.insert(
                    normalized.code.clone(),
                    CurrencyAccumulator::seed(&normalized, snapshot.date),
                );
                report.created += 1;
            }
        }
    }

    report
}

/// Owns the accumulators of a run and folds snapshots into them, newest first.
#[derive(Clone, Debug, Default)]
pub struct AggregationEngine {
    accumulators: AccumulatorSet,
    snapshots: usize,
}

impl AggregationEngine {
    /// Creates an engine with no accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the accumulators from the first processed snapshot.
    ///
    /// Any state from earlier folds is discarded.
    pub fn initialize(&mut self, snapshot: &Snapshot) -> FoldReport {
        self.accumulators.clear();
        self.snapshots = 0;
        self.update(snapshot)
    }

    /// Folds a subsequent, older snapshot into the accumulators.
    pub fn update(&mut self, snapshot: &Snapshot) -> FoldReport {
        let report = fold_snapshot(&mut self.accumulators, snapshot);
        self.snapshots += 1;
        report
    }

    /// Folds a snapshot, seeding the accumulators if nothing has been folded yet.
    pub fn fold(&mut self, snapshot: &Snapshot) -> FoldReport {
        if self.snapshots == 0 {
            self.initialize(snapshot)
        } else {
            self.update(snapshot)
        }
    }

    /// The number of snapshots folded so far, empty ones included.
    pub fn snapshots(&self) -> usize {
        self.snapshots
    }

    /// Read-only access to the accumulator of a currency.
    pub fn get(&self, code: &CurrencyCode) -> Option<&CurrencyAccumulator> {
        self.accumulators.get(code)
    }

    /// Returns the statistics of every currency seen, ordered by identity.
    pub fn results(&self) -> BTreeMap<CurrencyCode, AccumulatorSummary> {
        self.accumulators
            .iter()
            .map(|(code, accumulator)| (code.clone(), accumulator.summary()))
            .collect()
    }

    /// Hands the accumulator set over to the caller.
    pub fn into_accumulators(self) -> AccumulatorSet {
        self.accumulators
    }
}
