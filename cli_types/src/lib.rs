use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use chrono::prelude::*;

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Suite {
    #[value(name = "smoke", alias = "smokeTests")]
    Smoke,
    #[value(name = "ui-uat", alias = "uiUatTests")]
    UiUat,
    #[value(name = "pricing-override", alias = "pricingOverride")]
    PricingOverride,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    None,
    #[value(name = "asc")]
    Ascending,
    #[value(name = "desc")]
    Descending,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ColumnMode {
    #[default]
    All,
    Pass,
    Fail,
    Missing,
}

#[derive(Parser)]
#[command(version, name = "suite-trends")]
pub struct Cli {
    /// Increase verbosity level (can be specified multiple times.) The first level sets level
    /// "info", second sets level "debug", and third sets level "trace" for the logger.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}


#[derive(Args)]
pub struct CliInput {
    /// JSON report holding all suite kinds ('-' reads from stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,
}

#[derive(Args, Default)]
pub struct CliMatrixFilter {
    /// Only keep tests whose title contains this text (case-insensitive)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Only keep tests that flipped between two adjacent runs
    #[arg(long)]
    pub flaky: bool,

    /// Only keep tests failing in the latest run they were part of
    #[arg(long)]
    pub latest_failing: bool,

    /// Only keep tests whose last transition was pass -> fail
    #[arg(long)]
    pub new_failures: bool,

    /// Only keep tests whose last transition was fail -> pass
    #[arg(long)]
    pub recovered: bool,

    /// First day (inclusive, UTC) of runs to consider, as YYYY-MM-DD
    #[arg(long, value_parser = parse_day)]
    pub from: Option<NaiveDate>,

    /// Last day (inclusive, UTC) of runs to consider, as YYYY-MM-DD
    #[arg(long, value_parser = parse_day)]
    pub to: Option<NaiveDate>,

    /// Per-run filter as '<run key>=<all|pass|fail|missing>'
    #[arg(short, long = "column", value_parser = parse_column_filter)]
    pub columns: Vec<(String, ColumnMode)>,

    /// Order rows by pass rate
    #[arg(long, value_enum, default_value = "none")]
    pub sort: SortOrder,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the health of every suite kind: latest run, overall pass rate,
    /// rolling windows and a sparkline of the pass-rate history
    Summary {
        #[command(flatten)]
        input: CliInput,

        /// Reference instant for the rolling windows (RFC 3339), defaults to now
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,

        /// Trailing window length in days. Overrides `report.windows` from the
        /// configuration.
        #[arg(short, long = "window", value_parser = clap::value_parser!(u32).range(1..))]
        windows: Vec<u32>,
    },

    /// Print the combined pass-rate chart rows of all suite kinds, joined on
    /// identical run start timestamps
    Trend {
        #[command(flatten)]
        input: CliInput,

        /// Print run durations instead of pass rates
        #[arg(long)]
        durations: bool,
    },

    /// Print the per-test pass/fail matrix of one suite kind
    ///
    /// The date range restricts the run columns first. Pass rate and the
    /// flaky/new-failure/recovered flags are computed over the remaining runs
    /// only, so narrowing the range changes them.
    Matrix {
        #[command(flatten)]
        input: CliInput,

        /// Suite kind to show
        #[arg(short, long, value_enum)]
        suite: Suite,

        #[command(flatten)]
        filter: CliMatrixFilter,
    },

    /// Export the complete test matrix of one suite kind as CSV
    Export {
        #[command(flatten)]
        input: CliInput,

        /// Suite kind to export
        #[arg(short, long, value_enum)]
        suite: Suite,

        /// Output file ('-' for stdout). Defaults to
        /// '<Suite_Title>-<latest run timestamp>.csv'
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_column_filter(s: &str) -> Result<(String, ColumnMode)> {
    let pos = s
        .rfind('=')
        .ok_or_else(|| anyhow!("invalid column filter: no '=' found in '{}'", s))?;
    let key = &s[..pos];
    if key.is_empty() {
        return Err(anyhow!("invalid column filter: empty run key in '{}'", s));
    }
    let mode = ColumnMode::from_str(&s[pos + 1..], true).map_err(|e| anyhow!(e))?;
    Ok((key.to_string(), mode))
}

fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid day '{}': {}", input, e))
}

fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("invalid instant '{}': {}", input, e))
}
