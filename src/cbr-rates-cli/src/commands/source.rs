use cbr_rates::{CentralBankOfRussia, IsSource};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use crate::error::CliError;

use super::FetcherArgs;

#[derive(Debug, Args)]
pub struct SourceCommand {
    /// The day to build the URL for, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct Source {
    name: String,
    host: String,
    path: String,
    url: String,
}

fn describe(source: &CentralBankOfRussia, date: NaiveDate) -> Result<Source, CliError> {
    let source_url = source.get_url(date);
    let url = url::Url::parse(&source_url).map_err(|error| CliError::Url {
        url: source_url.clone(),
        error,
    })?;

    Ok(Source {
        name: source.to_string(),
        host: url.host_str().unwrap_or_default().to_string(),
        path: url.path().to_string(),
        url: source_url,
    })
}

pub fn exec(cmd: SourceCommand, args: &FetcherArgs) -> Result<(), CliError> {
    let source = CentralBankOfRussia::with_base_url(args.base_url.clone());
    let date = cmd
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    println!("{}", serde_json::to_string_pretty(&describe(&source, date)?)?);
    Ok(())
}
