use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::ObservationError;
use crate::types::{CurrencyCode, CurrencyObservation};

/// An observation whose nominal and value have been parsed and checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedObservation {
    /// The currency identity.
    pub code: CurrencyCode,
    /// The positive nominal.
    pub nominal: Decimal,
    /// The positive quoted value.
    pub value: Decimal,
    /// The domestic currency cost of one unit of the foreign currency.
    pub unit_rate: Decimal,
    /// The amount of foreign currency one domestic unit buys: nominal / value.
    pub inverse_rate: Decimal,
}

/// Parses a quoted value that uses a comma as the decimal separator.
pub fn parse_quoted_value(value: &str) -> Result<Decimal, ObservationError> {
    let normalized = value.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| ObservationError::MalformedValue(value.to_string()))
}

/// Parses a nominal and checks that it is a positive integer.
pub fn parse_nominal(nominal: &str) -> Result<Decimal, ObservationError> {
    let parsed = nominal
        .trim()
        .parse::<i64>()
        .map_err(|_| ObservationError::MalformedNominal(nominal.to_string()))?;
    if parsed <= 0 {
        return Err(ObservationError::InvalidNominal(parsed));
    }
    Ok(Decimal::from(parsed))
}

/// Turns a raw observation into its unit rate and inverse rate.
pub fn normalize(observation: &CurrencyObservation) -> Result<NormalizedObservation, ObservationError> {
    let nominal = parse_nominal(&observation.nominal)?;
    let value = parse_quoted_value(&observation.value)?;
    if value <= Decimal::ZERO {
        return Err(ObservationError::NonPositiveValue(observation.value.clone()));
    }

    let unit_rate = value.checked_div(nominal);
    let inverse_rate = nominal.checked_div(value);
    match (unit_rate, inverse_rate) {
        (Some(unit_rate), Some(inverse_rate)) => Ok(NormalizedObservation {
            code: observation.code.clone(),
            nominal,
            value,
            unit_rate,
            inverse_rate,
        }),
        _ => Err(overflow(observation)),
    }
}

pub(crate) fn overflow(observation: &CurrencyObservation) -> ObservationError {
    ObservationError::Overflow {
        nominal: observation.nominal.clone(),
        value: observation.value.clone(),
    }
}
