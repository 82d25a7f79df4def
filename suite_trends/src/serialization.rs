use std::{borrow::Cow, sync::OnceLock};

use chrono::{DateTime, SecondsFormat};
use itertools::Itertools;
use regex::Regex;

use crate::{
    data::{Cell, EpochMillis, RunSummary},
    matrix::{cells_for, TestMatrix},
};

pub const DELIMITER: &str = ",";

static WHITESPACE_RUN_REGEX: OnceLock<Regex> = OnceLock::new();

fn whitespace_run_regex() -> &'static Regex {
    WHITESPACE_RUN_REGEX.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"))
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso_timestamp(ms: EpochMillis) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Quote a field containing a delimiter, a double quote or a newline, doubling
/// inner double quotes.
pub fn escape_csv(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Render the complete test matrix of a suite kind as CSV.
///
/// The header holds the suite title and one timestamp per run in the given
/// order. Each test gets one row, sorted by title, with `pass`, `fail` or an
/// empty cell for runs it was not part of. Rows are separated by `\n`.
pub fn build_matrix_csv(suite_title: &str, runs: &[RunSummary], matrix: &TestMatrix) -> String {
    let header = std::iter::once(escape_csv(suite_title).into_owned())
        .chain(runs.iter().map(|r| escape_csv(&iso_timestamp(r.start)).into_owned()))
        .join(DELIMITER);

    let rows = matrix.iter().map(|(title, observations)| {
        std::iter::once(escape_csv(title))
            .chain(cells_for(observations, runs).into_iter().map(|cell| {
                Cow::Borrowed(match cell {
                    Cell::Observed(true) => "pass",
                    Cell::Observed(false) => "fail",
                    Cell::NotRun => "",
                })
            }))
            .join(DELIMITER)
    });

    std::iter::once(header).chain(rows).join("\n")
}

/// `<Suite_Title>-<YYYY-MM-DD-HH-MM-SS of the latest run>.csv`. The timestamp
/// part is empty without runs.
pub fn export_file_name(suite_title: &str, runs: &[RunSummary]) -> String {
    let title = whitespace_run_regex().replace_all(suite_title, "_");
    let timestamp = runs
        .iter()
        .map(|r| r.start)
        .max()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d-%H-%M-%S").to_string())
        .unwrap_or_default();
    format!("{title}-{timestamp}.csv")
}
