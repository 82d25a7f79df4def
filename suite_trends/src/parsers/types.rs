use std::collections::BTreeMap;

use serde::Deserialize;

use crate::data::SuiteKind;

/// All historical runs, grouped by suite kind and keyed by run identifier.
/// Kinds missing from the document are present with no runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestReport {
    pub suites: BTreeMap<SuiteKind, BTreeMap<String, RunRecord>>,
}

impl TestReport {
    /// Runs of `kind`, keyed by run identifier.
    pub fn runs(&self, kind: SuiteKind) -> impl Iterator<Item = (&String, &RunRecord)> {
        self.suites.get(&kind).into_iter().flatten()
    }

    pub fn run_count(&self, kind: SuiteKind) -> usize {
        self.suites.get(&kind).map_or(0, BTreeMap::len)
    }
}

/// One execution of a suite as recorded by the test runner.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunRecord {
    pub stats: RunStats,
    #[serde(default)]
    pub results: Vec<SuiteResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// ISO-8601 start of the run
    pub start: String,
    pub tests: u32,
    pub passes: u32,
    pub pass_percent: f64,
    /// Total run duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Top-level result block of a run. Nested suites and hooks are not read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuiteResult {
    #[serde(default)]
    pub tests: Vec<TestOutcome>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestOutcome {
    pub title: String,
    #[serde(default)]
    pub pass: bool,
    /// Test duration in milliseconds
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to read report input {path}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed report document")]
    Malformed(#[from] serde_json::Error),
}

/// Trait for parsers that convert an external report format to a TestReport
pub trait Parser {
    fn parse(&self, input: &str) -> Result<TestReport, ReportError>;
}
