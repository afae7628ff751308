use std::fmt::Write as _;

use cbr_rates::{
    run_window, AccumulatorSummary, WindowConfig, WindowSummary, DEFAULT_WINDOW_DAYS,
    MAX_WINDOW_DAYS,
};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::error::CliError;

use super::FetcherArgs;

const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Number of days to aggregate, the end date included.
    #[arg(long, env = "CBR_RATES_DAYS", default_value_t = DEFAULT_WINDOW_DAYS, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
    pub days: u32,
    /// Newest day of the window, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Count a document only once when the bank repeats it for a weekend or holiday.
    #[arg(long)]
    pub dedupe: bool,
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    folded_days: usize,
    skipped_days: usize,
    currencies: Vec<&'a AccumulatorSummary>,
}

pub async fn exec(cmd: SummaryCommand, args: &FetcherArgs) -> Result<(), CliError> {
    let fetcher = args.fetcher()?;
    let config = WindowConfig {
        days: cmd.days,
        end_date: cmd.date,
        dedupe_snapshots: cmd.dedupe,
    };
    info!(days = config.days, end_date = %config.end_date(), "aggregating");

    let summary = run_window(&fetcher, fetcher.source(), &config).await;

    if cmd.json {
        let report = JsonReport {
            folded_days: summary.folded_days(),
            skipped_days: summary.days.len() - summary.folded_days(),
            currencies: summary.results.values().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_table(&summary)?);
    }
    Ok(())
}

fn render_table(summary: &WindowSummary) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    if summary.results.is_empty() {
        out.push_str("No data for the requested window.\n");
        return Ok(out);
    }

    writeln!(
        out,
        "{:<6} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "CODE", "MAX", "MAX DATE", "MIN", "MIN DATE", "AVG PER RUB"
    )?;
    for currency in summary.results.values() {
        writeln!(
            out,
            "{:<6} {:>12.4} {:>12} {:>12.4} {:>12} {:>14.6}",
            currency.code.as_str(),
            currency.max_unit_rate,
            currency.max_date.format(DATE_FORMAT).to_string(),
            currency.min_unit_rate,
            currency.min_date.format(DATE_FORMAT).to_string(),
            currency.average,
        )?;
    }
    Ok(out)
}
