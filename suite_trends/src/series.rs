use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{
    data::{EpochMillis, RunSummary, SuiteKind},
    normalize::parse_start,
    parsers::TestReport,
};

/// One point of a suite kind's pass-rate trend.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub run_key: String,
    pub start: EpochMillis,
    pub pass_percent: f64,
}

/// One row of a combined multi-kind chart. Kinds without a run at exactly
/// `date` have no value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub date: EpochMillis,
    pub values: BTreeMap<SuiteKind, f64>,
}

impl ChartRow {
    pub fn get(&self, kind: SuiteKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }
}

/// Pass/fail split of one run, as drawn by stacked bar charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunBar {
    pub key: String,
    pub start: EpochMillis,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}

/// Pass-rate series of every suite kind, each sorted ascending by start.
pub fn extract_passing_series(
    runs_by_kind: &BTreeMap<SuiteKind, Vec<RunSummary>>,
) -> BTreeMap<SuiteKind, Vec<SeriesPoint>> {
    SuiteKind::ALL
        .into_iter()
        .map(|kind| {
            let points = runs_by_kind
                .get(&kind)
                .into_iter()
                .flatten()
                .map(|r| SeriesPoint {
                    run_key: r.key.clone(),
                    start: r.start,
                    pass_percent: r.pass_percent,
                })
                .sorted_by_key(|p| p.start)
                .collect();
            (kind, points)
        })
        .collect()
}

/// Join per-kind `(start, value)` series on identical start timestamps.
///
/// Every distinct start of any kind yields one row, in ascending order. A kind
/// contributes a value only when one of its runs started at exactly that
/// instant; near-simultaneous runs are different dates. If a kind has several
/// runs at the same instant the first one wins.
pub fn align_series(series: &BTreeMap<SuiteKind, Vec<(EpochMillis, f64)>>) -> Vec<ChartRow> {
    let merged = series
        .iter()
        .map(|(kind, points)| {
            points
                .iter()
                .sorted_by_key(|(start, _)| *start)
                .map(move |(start, value)| (*start, *kind, *value))
        })
        .kmerge_by(|a, b| a.0 < b.0);

    let mut rows = Vec::new();
    for (date, group) in &merged.chunk_by(|(start, _, _)| *start) {
        let mut values = BTreeMap::new();
        for (_, kind, value) in group {
            values.entry(kind).or_insert(value);
        }
        rows.push(ChartRow { date, values });
    }
    rows
}

/// Combined pass-rate chart of all suite kinds.
pub fn pass_rate_chart(series: &BTreeMap<SuiteKind, Vec<SeriesPoint>>) -> Vec<ChartRow> {
    let points: BTreeMap<SuiteKind, Vec<(EpochMillis, f64)>> = series
        .iter()
        .map(|(kind, points)| {
            (
                *kind,
                points.iter().map(|p| (p.start, p.pass_percent)).collect(),
            )
        })
        .collect();
    align_series(&points)
}

/// Run duration in minutes: the sum of the test durations (milliseconds) when
/// positive, else the run's own duration (seconds).
pub fn run_duration_minutes(run: &crate::parsers::RunRecord) -> f64 {
    let total_ms: f64 = run
        .results
        .iter()
        .flat_map(|r| r.tests.iter())
        .filter_map(|t| t.duration)
        .filter(|d| d.is_finite())
        .sum();

    if total_ms > 0.0 {
        total_ms / 60_000.0
    } else {
        run.stats.duration.filter(|d| d.is_finite()).unwrap_or(0.0) / 60.0
    }
}

/// Duration series (minutes) of every suite kind. Runs with an unparseable
/// start are skipped.
pub fn extract_duration_series(
    report: &TestReport,
) -> BTreeMap<SuiteKind, Vec<(EpochMillis, f64)>> {
    SuiteKind::ALL
        .into_iter()
        .map(|kind| {
            let points = report
                .runs(kind)
                .filter_map(|(_, run)| {
                    parse_start(&run.stats.start).map(|start| (start, run_duration_minutes(run)))
                })
                .sorted_by_key(|(start, _)| *start)
                .collect();
            (kind, points)
        })
        .collect()
}

/// Combined duration chart of all suite kinds.
pub fn duration_chart(report: &TestReport) -> Vec<ChartRow> {
    align_series(&extract_duration_series(report))
}

/// `runs` keep their order.
pub fn run_bars(runs: &[RunSummary]) -> Vec<RunBar> {
    runs.iter()
        .map(|r| RunBar {
            key: r.key.clone(),
            start: r.start,
            total: r.total,
            passed: r.passes,
            failed: r.fails,
        })
        .collect()
}
