use chrono::{Duration, NaiveDate};
use maplit::btreemap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::CurrencyObservation;

use super::*;

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 6, 28).expect("valid date") - Duration::days(offset)
}

fn snapshot(offset: i64, observations: &[(&str, &str, &str)]) -> Snapshot {
    Snapshot::new(
        day(offset),
        observations
            .iter()
            .map(|(code, nominal, value)| CurrencyObservation::new(*code, *nominal, *value))
            .collect(),
    )
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

/// Three days of USD quotes produce the expected extrema, dates and average.
#[test]
fn single_currency_over_three_days() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[("USD", "1", "90,00")]));
    engine.fold(&snapshot(1, &[("USD", "1", "95,50")]));
    engine.fold(&snapshot(2, &[("USD", "1", "88,25")]));

    let results = engine.results();
    let summary = &results[&usd()];
    assert_eq!(summary.max_unit_rate, dec!(95.50));
    assert_eq!(summary.max_date, day(1));
    assert_eq!(summary.min_unit_rate, dec!(88.25));
    assert_eq!(summary.min_date, day(2));
    assert_eq!(summary.observations, 3);

    let expected =
        (Decimal::ONE / dec!(90.00) + Decimal::ONE / dec!(95.50) + Decimal::ONE / dec!(88.25))
            / dec!(3);
    assert!((summary.average - expected).abs() < dec!(0.000000000001));
}

/// A single observation seeds both extrema at the snapshot date.
#[test]
fn initialize_seeds_both_extrema() {
    let mut engine = AggregationEngine::new();
    let report = engine.initialize(&snapshot(0, &[("USD", "1", "90,00"), ("EUR", "1", "98,10")]));
    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);

    let usd = engine.get(&usd()).expect("USD accumulator");
    assert_eq!(usd.max(), (dec!(90.00), day(0)));
    assert_eq!(usd.min(), (dec!(90.00), day(0)));
    assert_eq!(usd.observation_count(), 1);
    assert_eq!(usd.average(), Decimal::ONE / dec!(90.00));
}

/// Initializing again drops whatever was folded before.
#[test]
fn initialize_resets_previous_state() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[("USD", "1", "90,00")]));
    engine.initialize(&snapshot(1, &[("EUR", "1", "98,10")]));
    assert_eq!(engine.snapshots(), 1);
    assert!(engine.get(&usd()).is_none());
    assert!(engine.get(&CurrencyCode::new("EUR")).is_some());
}

/// The same price quoted per 10 units and per unit is a tie and keeps the first date.
#[test]
fn nominal_change_is_a_tie() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[("JPY", "10", "905,00")]));
    engine.fold(&snapshot(1, &[("JPY", "1", "90,50")]));

    let jpy = engine.get(&CurrencyCode::new("JPY")).expect("JPY accumulator");
    assert_eq!(jpy.max(), (dec!(90.5), day(0)));
    assert_eq!(jpy.min(), (dec!(90.5), day(0)));
    assert_eq!(jpy.observation_count(), 2);
}

/// A day without observations leaves the accumulators untouched.
#[test]
fn empty_snapshot_is_a_no_op() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[("USD", "1", "90,00"), ("EUR", "1", "98,10")]));
    let before = engine.results();

    let report = engine.fold(&snapshot(1, &[]));
    assert_eq!(report, FoldReport::default());
    assert_eq!(engine.results(), before);
}

/// An empty newest day still lets the next day seed the accumulators.
#[test]
fn empty_first_snapshot_then_data() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[]));
    engine.fold(&snapshot(1, &[("USD", "1", "90,00")]));

    let usd = engine.get(&usd()).expect("USD accumulator");
    assert_eq!(usd.max(), (dec!(90.00), day(1)));
    assert_eq!(usd.observation_count(), 1);
}

/// Rejected observations are skipped without touching the other currencies of the day.
#[test]
fn invalid_observations_are_skipped() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(
        0,
        &[("USD", "1", "90,00"), ("EUR", "1", "98,10"), ("GBP", "1", "110,00")],
    ));
    let report = engine.fold(&snapshot(
        1,
        &[("USD", "1", "0"), ("EUR", "-1", "97,00"), ("GBP", "1", "112,00")],
    ));

    assert_eq!(report.updated, 1);
    assert_eq!(
        report.skipped,
        vec![
            SkippedObservation {
                code: usd(),
                error: ObservationError::NonPositiveValue("0".to_string()),
            },
            SkippedObservation {
                code: CurrencyCode::new("EUR"),
                error: ObservationError::InvalidNominal(-1),
            },
        ]
    );

    let results = engine.results();
    assert_eq!(results[&usd()].observations, 1);
    assert_eq!(results[&CurrencyCode::new("EUR")].observations, 1);
    let gbp = &results[&CurrencyCode::new("GBP")];
    assert_eq!(gbp.observations, 2);
    assert_eq!(gbp.max_unit_rate, dec!(112.00));
    assert_eq!(gbp.max_date, day(1));
}

/// A currency missing from the newest snapshot is seeded at the older date.
#[test]
fn currency_appearing_on_an_older_date() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[("USD", "1", "90,00")]));
    let report = engine.fold(&snapshot(3, &[("USD", "1", "91,00"), ("XDR", "1", "120,00")]));
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 1);

    let results = engine.results();
    let xdr = &results[&CurrencyCode::new("XDR")];
    assert_eq!(xdr.max_date, day(3));
    assert_eq!(xdr.min_date, day(3));
    assert_eq!(xdr.observations, 1);
}

/// Reordering the currencies of a day does not misattribute values.
#[test]
fn alignment_is_by_identity_not_position() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[("AUD", "1", "40,00"), ("USD", "1", "90,00")]));
    engine.fold(&snapshot(1, &[("USD", "1", "91,00"), ("AUD", "1", "39,00")]));

    let results = engine.results();
    assert_eq!(
        results
            .iter()
            .map(|(code, s)| (code.as_str(), s.max_unit_rate, s.min_unit_rate))
            .collect::<Vec<_>>(),
        vec![("AUD", dec!(40.00), dec!(39.00)), ("USD", dec!(91.00), dec!(90.00))]
    );
}

/// Only the last occurrence of a repeated identity within a snapshot counts.
#[test]
fn duplicate_identity_last_write_wins() {
    let mut accumulators = AccumulatorSet::new();
    let report = fold_snapshot(
        &mut accumulators,
        &snapshot(0, &[("USD", "1", "90,00"), ("USD", "1", "91,00")]),
    );
    assert_eq!(report.accepted(), 1);

    let usd = &accumulators[&usd()];
    assert_eq!(usd.observation_count(), 1);
    assert_eq!(usd.max(), (dec!(91.00), day(0)));
}

/// Extrema and average do not depend on the order the days are folded in.
#[test]
fn fold_order_does_not_change_values() {
    let days = vec![
        snapshot(0, &[("USD", "1", "90,00"), ("HUF", "100", "15,2")]),
        snapshot(1, &[("USD", "1", "95,50"), ("HUF", "100", "14,9")]),
        snapshot(2, &[("USD", "1", "88,25")]),
        snapshot(3, &[("HUF", "100", "15,7"), ("USD", "1", "92,10")]),
    ];

    let mut newest_first = AccumulatorSet::new();
    days.iter().for_each(|s| {
        fold_snapshot(&mut newest_first, s);
    });
    let mut oldest_first = AccumulatorSet::new();
    days.iter().rev().for_each(|s| {
        fold_snapshot(&mut oldest_first, s);
    });

    for (code, accumulator) in &newest_first {
        let other = &oldest_first[code];
        assert_eq!(accumulator.max().0, other.max().0);
        assert_eq!(accumulator.min().0, other.min().0);
        assert_eq!(accumulator.observation_count(), other.observation_count());
        assert!((accumulator.average() - other.average()).abs() < dec!(0.000000000001));
    }
}

/// Every observed unit rate lies between the recorded extrema.
#[test]
fn extrema_bound_every_observation() {
    let quotes = btreemap! {
        0 => "74,1204",
        1 => "73,9992",
        2 => "75,0001",
        3 => "72,4410",
        4 => "74,1204",
        5 => "76,3000",
    };
    let mut engine = AggregationEngine::new();
    for (offset, value) in &quotes {
        engine.fold(&snapshot(*offset, &[("USD", "1", *value)]));
    }

    let results = engine.results();
    let summary = &results[&usd()];
    for value in quotes.values() {
        let rate = crate::normalize::parse_quoted_value(value).expect("valid value");
        assert!(summary.min_unit_rate <= rate && rate <= summary.max_unit_rate);
    }
    assert_eq!(summary.max_date, day(5));
    assert_eq!(summary.min_date, day(3));
    assert_eq!(summary.observations, quotes.len() as u64);
}

/// A tie with the current maximum keeps the most recent date.
#[test]
fn ties_keep_the_first_recorded_date() {
    let mut engine = AggregationEngine::new();
    engine.fold(&snapshot(0, &[("USD", "1", "95,50")]));
    engine.fold(&snapshot(1, &[("USD", "1", "90,00")]));
    engine.fold(&snapshot(2, &[("USD", "1", "95,50")]));
    engine.fold(&snapshot(3, &[("USD", "1", "90,00")]));

    let usd = engine.get(&usd()).expect("USD accumulator");
    assert_eq!(usd.max(), (dec!(95.50), day(0)));
    assert_eq!(usd.min(), (dec!(90.00), day(1)));
}

/// A rate that does not fit in a decimal is skipped, the rest of the day is kept.
#[test]
fn out_of_range_rate_is_skipped() {
    let mut set = AccumulatorSet::new();
    let report = fold_snapshot(
        &mut set,
        &snapshot(
            0,
            &[("USD", "1", "90,00"), ("XXX", "100", "0,0000000000000000000000000001")],
        ),
    );

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].code, CurrencyCode::new("XXX"));
    assert!(matches!(
        report.skipped[0].error,
        ObservationError::Overflow { .. }
    ));
    assert_eq!(set[&usd()].max(), (dec!(90.00), day(0)));
    assert!(!set.contains_key(&CurrencyCode::new("XXX")));
}

/// When the running sum would overflow the observation is dropped and the
/// accumulator keeps its previous state.
#[test]
fn overflowing_sum_leaves_accumulator_untouched() {
    let tiny = "0,0000000000000000000000000001";
    let mut engine = AggregationEngine::new();
    for offset in 0..7 {
        let report = engine.fold(&snapshot(offset, &[("XXX", "1", tiny)]));
        assert!(report.skipped.is_empty());
    }
    let before = engine.get(&CurrencyCode::new("XXX")).cloned();

    let report = engine.fold(&snapshot(7, &[("XXX", "1", tiny), ("USD", "1", "90,00")]));

    assert_eq!(report.accepted(), 1);
    assert!(matches!(
        report.skipped.as_slice(),
        [SkippedObservation {
            error: ObservationError::Overflow { .. },
            ..
        }]
    ));
    assert_eq!(engine.get(&CurrencyCode::new("XXX")).cloned(), before);
    assert_eq!(before.map(|xxx| xxx.observation_count()), Some(7));
}
