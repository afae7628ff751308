use chrono::NaiveDate;
use thiserror::Error;

/// Errors that occur while retrieving the raw document for one date.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built from the configuration.
    #[error("Failed to build the HTTP client: {0}")]
    Client(String),
    /// The request could not be sent or no response was received.
    #[error("Failed to request {url}: {message}")]
    Request {
        /// The requested URL.
        url: String,
        /// The transport error.
        message: String,
    },
    /// The source answered with a non-success status code.
    #[error("Request to {url} returned status {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The returned status code.
        status: u16,
    },
    /// The response body could not be read.
    #[error("Failed to read the body of {url}: {message}")]
    Body {
        /// The requested URL.
        url: String,
        /// The underlying error.
        message: String,
    },
}

/// Document level errors. A document that fails to parse contributes nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The bytes could not be decoded using the encoding the document declares.
    #[error("Failed to decode the document as {encoding}")]
    Decode {
        /// The name of the declared encoding.
        encoding: String,
    },
    /// The document is not a valid rates document.
    #[error("Failed to deserialize the document: {0}")]
    Xml(String),
    /// The document has no date attribute.
    #[error("The document does not carry a date")]
    MissingDate,
    /// The date attribute could not be parsed.
    #[error("The document date {0:?} is invalid")]
    InvalidDate(String),
}

/// Field level errors. Only the offending observation is skipped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ObservationError {
    /// The quoted value is not a number.
    #[error("Malformed value {0:?}")]
    MalformedValue(String),
    /// The nominal is not an integer.
    #[error("Malformed nominal {0:?}")]
    MalformedNominal(String),
    /// The nominal is zero or negative.
    #[error("Nominal must be positive, got {0}")]
    InvalidNominal(i64),
    /// The quoted value is zero or negative, its inverse is undefined.
    #[error("Value must be positive, got {0:?}")]
    NonPositiveValue(String),
    /// A derived rate or running sum does not fit in a decimal.
    #[error("Rate of {nominal} per {value} is out of range")]
    Overflow {
        /// The raw nominal.
        nominal: String,
        /// The raw quoted value.
        value: String,
    },
}

/// The reason a whole date was left out of the aggregation.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The document repeats a date that has already been aggregated.
    #[error("The snapshot for {date} has already been aggregated")]
    Repeated {
        /// The date found in the repeated document.
        date: NaiveDate,
    },
}
