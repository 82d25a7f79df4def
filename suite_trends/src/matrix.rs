use std::collections::{BTreeMap, HashMap};

use crate::{
    data::{Cell, Observation, RunSummary, SuiteKind},
    normalize::parse_start,
    parsers::{RunRecord, TestReport},
};

/// Test title to its chronological observations, one per run the test was
/// part of. Titles are the identity of a test: equal titles from different
/// test files are the same test.
pub type TestMatrix = BTreeMap<String, Vec<Observation>>;

/// Build the test matrix of one suite kind.
///
/// Runs whose start cannot be parsed are skipped, like in the run summaries.
pub fn build_matrix<'a>(runs: impl IntoIterator<Item = (&'a String, &'a RunRecord)>) -> TestMatrix {
    let mut matrix = TestMatrix::new();

    for (run_key, run) in runs {
        let Some(start) = parse_start(&run.stats.start) else {
            continue;
        };
        for outcome in run.results.iter().flat_map(|r| r.tests.iter()) {
            matrix
                .entry(outcome.title.clone())
                .or_default()
                .push(Observation {
                    run_key: run_key.clone(),
                    start,
                    pass: outcome.pass,
                });
        }
    }

    // Stable sort keeps the run order for identical starts
    for observations in matrix.values_mut() {
        observations.sort_by_key(|o| o.start);
    }

    matrix
}

pub fn matrix_by_kind(report: &TestReport) -> BTreeMap<SuiteKind, TestMatrix> {
    SuiteKind::ALL
        .into_iter()
        .map(|kind| (kind, build_matrix(report.runs(kind))))
        .collect()
}

/// Lay out a test's observations over the given run columns. Runs the test
/// was not part of become [`Cell::NotRun`].
pub fn cells_for(observations: &[Observation], columns: &[RunSummary]) -> Vec<Cell> {
    let by_run: HashMap<&str, bool> = observations
        .iter()
        .map(|o| (o.run_key.as_str(), o.pass))
        .collect();

    columns
        .iter()
        .map(|run| match by_run.get(run.key.as_str()) {
            Some(pass) => Cell::Observed(*pass),
            None => Cell::NotRun,
        })
        .collect()
}
