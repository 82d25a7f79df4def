use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use crate::{
    data::{EpochMillis, RunSummary, SuiteKind},
    parsers::{RunRecord, TestReport},
};

/// ISO-8601 forms with an offset that RFC 3339 parsing rejects: basic offsets
/// (`+0200`), times without seconds and a space separator.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Date-times without offset, taken as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp to epoch milliseconds.
///
/// Accepts RFC 3339, the offset forms above, date-times without offset (taken
/// as UTC) and plain dates (UTC midnight). Returns `None` for anything else.
pub fn parse_start(start: &str) -> Option<EpochMillis> {
    let start = start.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(start) {
        return Some(dt.timestamp_millis());
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(start, fmt).ok())
    {
        return Some(dt.timestamp_millis());
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(start, fmt).ok())
    {
        return Some(naive.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Summarize one run, or `None` if its start cannot be parsed.
pub fn summarize_run(key: &str, run: &RunRecord) -> Option<RunSummary> {
    let Some(start) = parse_start(&run.stats.start) else {
        debug!(
            "Dropping run '{key}': cannot parse start '{}'",
            run.stats.start
        );
        return None;
    };

    Some(RunSummary {
        key: key.to_string(),
        start,
        total: run.stats.tests,
        passes: run.stats.passes,
        fails: run.stats.tests.saturating_sub(run.stats.passes),
        pass_percent: run.stats.pass_percent,
    })
}

/// Turn one suite kind's runs into summaries. Runs with an unparseable start
/// are dropped silently. The result is not sorted.
pub fn normalize_runs<'a>(
    runs: impl IntoIterator<Item = (&'a String, &'a RunRecord)>,
) -> Vec<RunSummary> {
    runs.into_iter()
        .filter_map(|(key, run)| summarize_run(key, run))
        .collect()
}

/// Run summaries of every suite kind, sorted ascending by start.
pub fn runs_by_kind(report: &TestReport) -> BTreeMap<SuiteKind, Vec<RunSummary>> {
    SuiteKind::ALL
        .into_iter()
        .map(|kind| {
            let mut runs = normalize_runs(report.runs(kind));
            runs.sort_by_key(|r| r.start);
            (kind, runs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{july_ms, report_of, run_record};

    #[test]
    fn test_parse_start_formats() {
        assert_eq!(parse_start("1970-01-01T00:00:01.500Z"), Some(1500));
        assert_eq!(parse_start("1970-01-01T01:00:00+01:00"), Some(0));
        assert_eq!(parse_start("1970-01-02T00:00:00"), Some(86_400_000));
        assert_eq!(parse_start("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_start(" 1970-01-01T00:00:00Z "), Some(0));
        assert_eq!(parse_start("not a date"), None);
        assert_eq!(parse_start("2025-07-01T10:00:00"), Some(july_ms(1, 10)));
        assert_eq!(parse_start("2025-07-01T99:00:00Z"), None);
    }

    #[test]
    fn test_parse_start_lenient_iso_forms() {
        // Basic-format offsets
        assert_eq!(parse_start("2025-07-01T10:00:00+0200"), Some(july_ms(1, 8)));
        assert_eq!(
            parse_start("2025-07-01T10:00:00.250-0100"),
            Some(july_ms(1, 11) + 250)
        );
        // Minutes precision
        assert_eq!(parse_start("2025-07-01T10:00Z"), Some(july_ms(1, 10)));
        assert_eq!(parse_start("2025-07-01T10:00+02:00"), Some(july_ms(1, 8)));
        assert_eq!(parse_start("2025-07-01T10:00"), Some(july_ms(1, 10)));
        // Space separator
        assert_eq!(parse_start("2025-07-01 10:00:00"), Some(july_ms(1, 10)));
        assert_eq!(parse_start("2025-07-01 10:00:00.000Z"), Some(july_ms(1, 10)));
        assert_eq!(parse_start("2025-07-01 10:00+0200"), Some(july_ms(1, 8)));
        assert_eq!(parse_start("2025-07-01 10:00"), Some(july_ms(1, 10)));
        assert_eq!(parse_start(""), None);
    }

    #[test]
    fn test_fails_floored_at_zero() {
        let mut run = run_record("2025-07-01T00:00:00Z", &[]);
        run.stats.tests = 3;
        run.stats.passes = 5;
        let summary = summarize_run("r", &run).unwrap();
        assert_eq!(summary.fails, 0);

        run.stats.passes = 1;
        let summary = summarize_run("r", &run).unwrap();
        assert_eq!(summary.fails, 2);
    }

    #[test]
    fn test_unparseable_start_is_dropped() {
        let report = report_of(
            SuiteKind::SmokeTests,
            vec![
                ("good", run_record("2025-07-02T00:00:00Z", &[("a", true)])),
                ("bad", run_record("yesterday-ish", &[("a", false)])),
            ],
        );

        let runs = runs_by_kind(&report);
        let smoke = &runs[&SuiteKind::SmokeTests];
        assert_eq!(smoke.len(), 1);
        assert_eq!(smoke[0].key, "good");
        assert!(runs[&SuiteKind::UiUatTests].is_empty());
        assert!(runs[&SuiteKind::PricingOverride].is_empty());
    }

    #[test]
    fn test_runs_by_kind_sorted_by_start() {
        let report = report_of(
            SuiteKind::UiUatTests,
            vec![
                ("a-late", run_record("2025-07-03T00:00:00Z", &[])),
                ("b-early", run_record("2025-07-01T00:00:00Z", &[])),
                ("c-mid", run_record("2025-07-02T00:00:00Z", &[])),
            ],
        );

        let keys: Vec<_> = runs_by_kind(&report)[&SuiteKind::UiUatTests]
            .iter()
            .map(|r| r.key.clone())
            .collect();
        assert_eq!(keys, vec!["b-early", "c-mid", "a-late"]);
    }
}
