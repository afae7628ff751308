use std::time::Duration;

use cbr_rates::{FetcherConfig, HttpFetcher};
use clap::{Args, Subcommand};

use crate::error::CliError;

pub mod snapshot;
pub mod source;
pub mod summary;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregates the rates of a window of days.
    Summary(summary::SummaryCommand),
    /// Prints the parsed document of a single day.
    Snapshot(snapshot::SnapshotCommand),
    /// Prints where the rates are requested from.
    Source(source::SourceCommand),
}

/// Options shared by every command that talks to the central bank.
#[derive(Debug, Args)]
pub struct FetcherArgs {
    /// URL template of the daily document, `DATE` is replaced with dd/mm/yyyy.
    #[arg(long, global = true, env = "CBR_RATES_BASE_URL", default_value = cbr_rates::source::DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Value of the User-Agent header.
    #[arg(long, global = true, env = "CBR_RATES_USER_AGENT", default_value = cbr_rates::config::DEFAULT_USER_AGENT)]
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "CBR_RATES_TIMEOUT_SECS", default_value_t = cbr_rates::config::DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl FetcherArgs {
    pub fn config(&self) -> FetcherConfig {
        FetcherConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn fetcher(&self) -> Result<HttpFetcher, CliError> {
        Ok(HttpFetcher::new(&self.config())?)
    }
}

pub async fn dispatch(command: Command, fetcher: &FetcherArgs) -> Result<(), CliError> {
    match command {
        Command::Summary(cmd) => summary::exec(cmd, fetcher).await,
        Command::Snapshot(cmd) => snapshot::exec(cmd, fetcher).await,
        Command::Source(cmd) => source::exec(cmd, fetcher),
    }
}
