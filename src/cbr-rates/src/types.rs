use chrono::NaiveDate;
use serde::Serialize;

/// The stable identity of a currency across daily snapshots, e.g. `USD`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a code. Codes are compared in uppercase.
    pub fn new<S: AsRef<str>>(code: S) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// A single currency as published for one date. The nominal and the value are
/// kept as the raw text of the feed; [crate::normalize] turns them into numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrencyObservation {
    /// The currency identity.
    pub code: CurrencyCode,
    /// The ISO 4217 numeric code, if the feed provides one.
    pub num_code: Option<String>,
    /// The human readable name as published.
    pub name: Option<String>,
    /// The number of currency units the value is quoted for.
    pub nominal: String,
    /// The quoted value, using a comma as the decimal separator.
    pub value: String,
}

impl CurrencyObservation {
    /// Creates an observation with only the fields needed for aggregation.
    pub fn new<C, N, V>(code: C, nominal: N, value: V) -> Self
    where
        C: Into<CurrencyCode>,
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            code: code.into(),
            num_code: None,
            name: None,
            nominal: nominal.into(),
            value: value.into(),
        }
    }
}

/// All observations published for one calendar date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// The date the document says the rates are set for.
    pub date: NaiveDate,
    /// The observations in the order they appear in the document.
    pub observations: Vec<CurrencyObservation>,
}

impl Snapshot {
    /// Creates a snapshot from a date and its observations.
    pub fn new(date: NaiveDate, observations: Vec<CurrencyObservation>) -> Self {
        Self { date, observations }
    }

    /// Returns true if the snapshot carries no observations, e.g. on a holiday.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
