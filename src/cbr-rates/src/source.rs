mod russia;

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};

use crate::errors::ParseError;
use crate::types::Snapshot;

pub use russia::{CentralBankOfRussia, DEFAULT_BASE_URL};


/// The base URL may contain the following placeholders:
/// `DATE`: This string must be replaced with the date string as provided by `format_date`.
pub const DATE: &str = "DATE";

/// Converts a raw document into a typed [Snapshot].
pub trait SnapshotParser {
    /// Parses the raw bytes as returned by the source.
    fn parse(&self, bytes: &[u8]) -> Result<Snapshot, ParseError>;
}

/// This trait is used to provide the basic methods needed for a daily rates source.
pub trait IsSource: SnapshotParser {
    /// The name of the source, used in logs and reports.
    fn name(&self) -> &str;

    /// The base URL template that is provided to [IsSource::get_url].
    fn get_base_url(&self) -> &str;

    /// Provides the ability to format the date as a string. Default implementation
    /// is ISO 8601.
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// A default implementation to generate a URL based on the given date.
    /// The method takes the base URL for the source and replaces the following
    /// placeholders:
    /// * [DATE]
    fn get_url(&self, date: NaiveDate) -> String {
        self.get_base_url().replace(DATE, &self.format_date(date))
    }
}

/// Decodes a document into text using the encoding named in its XML declaration
/// and strips the declaration, since it no longer describes the text.
pub(crate) fn decode_xml(bytes: &[u8]) -> Result<String, ParseError> {
    let encoding = declared_encoding(bytes).unwrap_or(UTF_8);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ParseError::Decode {
            encoding: encoding.name().to_string(),
        });
    }

    let text = text.trim_start();
    let body = if text.starts_with("<?xml") {
        match text.find("?>") {
            Some(end) => &text[end + 2..],
            None => return Err(ParseError::Xml("unterminated XML declaration".to_string())),
        }
    } else {
        text
    };
    Ok(body.to_string())
}

/// Reads the `encoding` attribute of the XML declaration, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let end = bytes.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&bytes[..end]).ok()?;
    if !declaration.trim_start_matches('\u{feff}').trim_start().starts_with("<?xml") {
        return None;
    }
    let (_, rest) = declaration.split_once("encoding")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = rest[1..].split(quote).next()?;
    Encoding::for_label(label.trim().as_bytes())
}
