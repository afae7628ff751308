use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ParseError;
use crate::types::{CurrencyCode, CurrencyObservation, Snapshot};

use super::{decode_xml, IsSource, SnapshotParser};

/// The daily rates endpoint. `DATE` is replaced with the requested day.
pub const DEFAULT_BASE_URL: &str = "https://www.cbr.ru/scripts/XML_daily.asp?date_req=DATE";

#[derive(Debug, Deserialize)]
struct XmlValCurs {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Valute", default)]
    valutes: Vec<XmlValute>,
}

#[derive(Debug, Deserialize)]
struct XmlValute {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "NumCode", default)]
    num_code: Option<String>,
    #[serde(rename = "CharCode", default)]
    char_code: Option<String>,
    #[serde(rename = "Nominal", default)]
    nominal: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Value", default)]
    value: String,
}

impl XmlValute {
    /// The alphabetic code identifies a currency. Entries without one fall back
    /// to the source's internal id.
    fn code(&self) -> Option<CurrencyCode> {
        [&self.char_code, &self.id]
            .into_iter()
            .flatten()
            .map(|code| code.trim())
            .find(|code| !code.is_empty())
            .map(CurrencyCode::new)
    }
}

/// Central Bank of the Russian Federation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CentralBankOfRussia {
    base_url: String,
}

impl Default for CentralBankOfRussia {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CentralBankOfRussia {
    /// Creates the source with a custom URL template, e.g. a mirror.
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl core::fmt::Display for CentralBankOfRussia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl SnapshotParser for CentralBankOfRussia {
    fn parse(&self, bytes: &[u8]) -> Result<Snapshot, ParseError> {
        let text = decode_xml(bytes)?;
        let document: XmlValCurs = serde_xml_rs::from_str(&text)
            .map_err(|e| ParseError::Xml(format!("{:?}", e)))?;

        let raw_date = document
            .date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .ok_or(ParseError::MissingDate)?;
        let date = NaiveDate::parse_from_str(raw_date, "%d.%m.%Y")
            .or_else(|_| NaiveDate::parse_from_str(raw_date, "%d/%m/%Y"))
            .map_err(|_| ParseError::InvalidDate(raw_date.to_string()))?;

        let observations = document
            .valutes
            .into_iter()
            .filter_map(|valute| match valute.code() {
                Some(code) => Some(CurrencyObservation {
                    code,
                    num_code: valute.num_code,
                    name: valute.name.map(|name| name.trim().to_string()),
                    nominal: valute.nominal,
                    value: valute.value,
                }),
                None => {
                    debug!(%date, "skipping currency without a code");
                    None
                }
            })
            .collect();

        Ok(Snapshot::new(date, observations))
    }
}

impl IsSource for CentralBankOfRussia {
    fn name(&self) -> &str {
        "CentralBankOfRussia"
    }

    fn get_base_url(&self) -> &str {
        &self.base_url
    }

    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }
}
