//! Centralized test helpers for suite-trends
//!
//! Builders for in-memory reports used across unit tests, integration tests
//! and benchmarks.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use crate::{
    data::{EpochMillis, SuiteKind},
    parsers::{RunRecord, RunStats, SuiteResult, TestOutcome, TestReport},
};

/// Builds a run record starting at `start` with one flat result block holding
/// `outcomes`. Totals and pass percentage are derived from the outcomes.
pub fn run_record(start: &str, outcomes: &[(&str, bool)]) -> RunRecord {
    let tests = outcomes.len() as u32;
    let passes = outcomes.iter().filter(|(_, pass)| *pass).count() as u32;
    let pass_percent = if tests > 0 {
        100.0 * f64::from(passes) / f64::from(tests)
    } else {
        0.0
    };

    RunRecord {
        stats: RunStats {
            start: start.to_string(),
            tests,
            passes,
            pass_percent,
            duration: None,
        },
        results: vec![SuiteResult {
            tests: outcomes
                .iter()
                .map(|(title, pass)| TestOutcome {
                    title: title.to_string(),
                    pass: *pass,
                    duration: None,
                })
                .collect(),
        }],
    }
}

/// Builds a report where only `kind` has runs.
pub fn report_of(kind: SuiteKind, runs: Vec<(&str, RunRecord)>) -> TestReport {
    let mut report = TestReport::default();
    for k in SuiteKind::ALL {
        report.suites.insert(k, BTreeMap::new());
    }
    report.suites.insert(
        kind,
        runs.into_iter()
            .map(|(key, run)| (key.to_string(), run))
            .collect(),
    );
    report
}

/// ISO-8601 start of the `day`-th day of July 2025 at `hour`:00 UTC.
pub fn july(day: u32, hour: u32) -> String {
    format!("2025-07-{day:02}T{hour:02}:00:00.000Z")
}

/// Epoch milliseconds of [`july`].
pub fn july_ms(day: u32, hour: u32) -> EpochMillis {
    Utc.with_ymd_and_hms(2025, 7, day, hour, 0, 0)
        .unwrap()
        .timestamp_millis()
}
