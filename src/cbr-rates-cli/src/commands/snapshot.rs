use cbr_rates::load_snapshot;
use chrono::NaiveDate;
use clap::Args;

use crate::error::CliError;

use super::FetcherArgs;

#[derive(Debug, Args)]
pub struct SnapshotCommand {
    /// The day to fetch, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub async fn exec(cmd: SnapshotCommand, args: &FetcherArgs) -> Result<(), CliError> {
    let fetcher = args.fetcher()?;
    let date = cmd
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let snapshot = load_snapshot(&fetcher, fetcher.source(), date).await?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
