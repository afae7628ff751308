use std::time::Duration;

use chrono::NaiveDate;

use crate::source::DEFAULT_BASE_URL;

/// The number of days aggregated when nothing else is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// The longest window the command line accepts, about a century.
pub const MAX_WINDOW_DAYS: u32 = 36_525;

/// The `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("cbr-rates/", env!("CARGO_PKG_VERSION"));

/// The per-request timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Controls which dates are aggregated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// The number of consecutive days, the end date included.
    pub days: u32,
    /// The newest date of the window. `None` means today.
    pub end_date: Option<NaiveDate>,
    /// Skip a document whose date has already been aggregated. The source
    /// answers weekends and holidays with the previous business day.
    pub dedupe_snapshots: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_WINDOW_DAYS,
            end_date: None,
            dedupe_snapshots: false,
        }
    }
}

impl WindowConfig {
    /// The end date, falling back to today's local date.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Controls how documents are requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetcherConfig {
    /// The URL template, with `DATE` as the placeholder for the requested day.
    pub base_url: String,
    /// The `User-Agent` header value.
    pub user_agent: String,
    /// The timeout of a single request.
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
