use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use env_logger::Env;
use log::Level;

use crate::config;
use crate::data::SuiteKind;
use crate::filter::{DateRange, MatrixFilter, QuickFilters};
use crate::reporting::{export, matrix, summary, trend};
use suite_trends_cli_types::{Cli, CliMatrixFilter, Commands};

pub fn handle_calls() -> Result<()> {
    let cli = Cli::parse();
    let logger_level = match cli.verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(logger_level.as_str())).init();

    match cli.command {
        Commands::Summary {
            input,
            now,
            windows,
        } => {
            let windows = if windows.is_empty() {
                config::report_windows()
            } else {
                windows
            };
            let now = now.unwrap_or_else(Utc::now).timestamp_millis();
            summary(&input.input, now, &windows)
        }
        Commands::Trend { input, durations } => trend(&input.input, durations),
        Commands::Matrix {
            input,
            suite,
            filter,
        } => matrix(&input.input, SuiteKind::from(suite), &MatrixFilter::from(filter)),
        Commands::Export {
            input,
            suite,
            output,
        } => export(&input.input, SuiteKind::from(suite), output),
    }
}

impl From<CliMatrixFilter> for MatrixFilter {
    fn from(filter: CliMatrixFilter) -> Self {
        MatrixFilter {
            text: filter.text,
            quick: QuickFilters {
                flaky: filter.flaky,
                latest_failing: filter.latest_failing,
                new_failures: filter.new_failures,
                recovered: filter.recovered,
            },
            range: DateRange {
                from: filter.from,
                to: filter.to,
            },
            // Later settings for the same run win
            columns: filter
                .columns
                .into_iter()
                .map(|(key, mode)| (key, mode.into()))
                .collect(),
            sort: filter.sort.into(),
        }
    }
}
