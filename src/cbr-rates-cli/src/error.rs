use cbr_rates::{FetchError, SnapshotError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("invalid source URL {url}: {error}")]
    Url { url: String, error: url::ParseError },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("failed to render the report")]
    Format(#[from] std::fmt::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Fetch(_) => 3,
            Self::Snapshot(_) => 3,
            Self::Url { .. } => 2,
            Self::Serialization(_) | Self::Format(_) => 4,
        }
    }
}
