use std::fmt::Display;

use suite_trends_cli_types::Suite;

/// Milliseconds since the Unix epoch, UTC.
pub type EpochMillis = i64;

pub const MS_PER_DAY: EpochMillis = 24 * 60 * 60 * 1000;

/// The fixed set of end-to-end suite kinds. Data of different kinds is never
/// mixed in any aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SuiteKind {
    SmokeTests,
    UiUatTests,
    PricingOverride,
}

impl SuiteKind {
    pub const ALL: [SuiteKind; 3] = [
        SuiteKind::SmokeTests,
        SuiteKind::UiUatTests,
        SuiteKind::PricingOverride,
    ];

    /// Key of this kind in the report document.
    pub fn key(self) -> &'static str {
        match self {
            SuiteKind::SmokeTests => "smokeTests",
            SuiteKind::UiUatTests => "uiUatTests",
            SuiteKind::PricingOverride => "pricingOverride",
        }
    }

    pub fn from_key(key: &str) -> Option<SuiteKind> {
        SuiteKind::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            SuiteKind::SmokeTests => "Smoke Tests",
            SuiteKind::UiUatTests => "UI UAT Tests",
            SuiteKind::PricingOverride => "Pricing Override",
        }
    }

    /// Short label used in chart legends and health cards.
    pub fn label(self) -> &'static str {
        match self {
            SuiteKind::SmokeTests => "Smoke",
            SuiteKind::UiUatTests => "UI UAT",
            SuiteKind::PricingOverride => "Pricing Override",
        }
    }
}

impl Display for SuiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl From<Suite> for SuiteKind {
    fn from(suite: Suite) -> Self {
        match suite {
            Suite::Smoke => SuiteKind::SmokeTests,
            Suite::UiUat => SuiteKind::UiUatTests,
            Suite::PricingOverride => SuiteKind::PricingOverride,
        }
    }
}

/// Uniform view of one ingested run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub key: String,
    pub start: EpochMillis,
    pub total: u32,
    pub passes: u32,
    /// `total - passes`, floored at zero.
    pub fails: u32,
    pub pass_percent: f64,
}

/// Outcome of one test in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub run_key: String,
    pub start: EpochMillis,
    pub pass: bool,
}

/// State of a test in a given run column. A test that was not part of a run is
/// `NotRun`, never a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Observed(bool),
    NotRun,
}

impl Cell {
    pub fn passed(self) -> bool {
        matches!(self, Cell::Observed(true))
    }

    pub fn observed(self) -> Option<bool> {
        match self {
            Cell::Observed(pass) => Some(pass),
            Cell::NotRun => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Observed(true) => f.write_str("pass"),
            Cell::Observed(false) => f.write_str("fail"),
            Cell::NotRun => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_kind_keys_round_trip() {
        for kind in SuiteKind::ALL {
            assert_eq!(SuiteKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(SuiteKind::from_key("nightly"), None);
    }

    #[test]
    fn test_suite_kind_from_cli() {
        assert_eq!(SuiteKind::from(Suite::Smoke), SuiteKind::SmokeTests);
        assert_eq!(SuiteKind::from(Suite::UiUat), SuiteKind::UiUatTests);
        assert_eq!(
            SuiteKind::from(Suite::PricingOverride),
            SuiteKind::PricingOverride
        );
    }

    #[test]
    fn test_cell_not_run_is_not_a_failure() {
        assert_eq!(Cell::NotRun.observed(), None);
        assert!(!Cell::NotRun.passed());
        assert_eq!(Cell::Observed(false).observed(), Some(false));
        assert_eq!(Cell::NotRun.to_string(), "-");
        assert_eq!(Cell::Observed(true).to_string(), "pass");
    }
}
