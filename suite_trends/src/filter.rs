//! Filtering and sorting of a suite kind's test matrix.
//!
//! The whole filter state is one immutable [`MatrixFilter`] value. Applying it
//! re-derives every row from the matrix, so a narrower date range changes pass
//! rates and flags, not only the visible columns.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use suite_trends_cli_types::{ColumnMode as CliColumnMode, SortOrder};

use crate::{
    data::{Cell, EpochMillis, RunSummary},
    matrix::{cells_for, TestMatrix},
    trend::{classify, TrendClassification},
};

/// Inclusive range of days; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// `from` 00:00:00.000 and `to` 23:59:59.999, both UTC.
    pub fn bounds(&self) -> (Option<EpochMillis>, Option<EpochMillis>) {
        let lower = self.from.and_then(|d| {
            d.and_hms_milli_opt(0, 0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis())
        });
        let upper = self.to.and_then(|d| {
            d.and_hms_milli_opt(23, 59, 59, 999)
                .map(|dt| dt.and_utc().timestamp_millis())
        });
        (lower, upper)
    }

    pub fn contains(&self, start: EpochMillis) -> bool {
        let (lower, upper) = self.bounds();
        lower.map_or(true, |l| start >= l) && upper.map_or(true, |u| start <= u)
    }
}

/// Requirement on the cell of one run column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnMode {
    #[default]
    All,
    Pass,
    Fail,
    Missing,
}

impl ColumnMode {
    pub fn accepts(self, cell: Cell) -> bool {
        match self {
            ColumnMode::All => true,
            ColumnMode::Pass => cell == Cell::Observed(true),
            ColumnMode::Fail => cell == Cell::Observed(false),
            ColumnMode::Missing => cell == Cell::NotRun,
        }
    }
}

impl From<CliColumnMode> for ColumnMode {
    fn from(mode: CliColumnMode) -> Self {
        match mode {
            CliColumnMode::All => ColumnMode::All,
            CliColumnMode::Pass => ColumnMode::Pass,
            CliColumnMode::Fail => ColumnMode::Fail,
            CliColumnMode::Missing => ColumnMode::Missing,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    None,
    Ascending,
    Descending,
}

impl From<SortOrder> for SortMode {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::None => SortMode::None,
            SortOrder::Ascending => SortMode::Ascending,
            SortOrder::Descending => SortMode::Descending,
        }
    }
}

/// Quick toggles. Enabled toggles must all hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickFilters {
    pub flaky: bool,
    pub latest_failing: bool,
    pub new_failures: bool,
    pub recovered: bool,
}

impl QuickFilters {
    pub fn accepts(&self, trend: &TrendClassification) -> bool {
        (!self.flaky || trend.is_flaky)
            && (!self.latest_failing || trend.latest_fail)
            && (!self.new_failures || trend.new_failure)
            && (!self.recovered || trend.recovered)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixFilter {
    /// Case-insensitive substring of the test title
    pub text: Option<String>,
    pub quick: QuickFilters,
    pub range: DateRange,
    /// Run key to required cell state. Keys of runs outside the date range
    /// are ignored.
    pub columns: BTreeMap<String, ColumnMode>,
    pub sort: SortMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub title: String,
    /// One cell per column of the view
    pub cells: Vec<Cell>,
    pub trend: TrendClassification,
}

/// Rows and run columns left after filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixView {
    pub columns: Vec<RunSummary>,
    pub rows: Vec<MatrixRow>,
}

/// Apply `filter` to one suite kind's matrix.
///
/// `runs` must be sorted ascending by start. Steps: restrict the run columns
/// to the date range, recompute cells and classification over those columns,
/// then filter by text, quick toggles and column modes, and finally sort by
/// pass rate. Without sorting rows are in title order, which is also the
/// tie-break.
pub fn apply_filter(runs: &[RunSummary], matrix: &TestMatrix, filter: &MatrixFilter) -> MatrixView {
    let columns: Vec<RunSummary> = runs
        .iter()
        .filter(|r| filter.range.contains(r.start))
        .cloned()
        .collect();

    // Whitespace-only text does not filter; otherwise it is matched verbatim
    let needle = filter
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase);

    let column_modes: Vec<(usize, ColumnMode)> = columns
        .iter()
        .enumerate()
        .filter_map(|(i, run)| {
            filter
                .columns
                .get(&run.key)
                .filter(|mode| **mode != ColumnMode::All)
                .map(|mode| (i, *mode))
        })
        .collect();

    let mut rows: Vec<MatrixRow> = matrix
        .iter()
        .map(|(title, observations)| {
            let cells = cells_for(observations, &columns);
            let trend = classify(&cells);
            MatrixRow {
                title: title.clone(),
                cells,
                trend,
            }
        })
        .filter(|row| {
            needle
                .as_ref()
                .map_or(true, |n| row.title.to_lowercase().contains(n.as_str()))
        })
        .filter(|row| filter.quick.accepts(&row.trend))
        .filter(|row| {
            column_modes
                .iter()
                .all(|(i, mode)| mode.accepts(row.cells[*i]))
        })
        .collect();

    match filter.sort {
        SortMode::None => {}
        SortMode::Ascending => rows.sort_by_key(|r| r.trend.pass_rate),
        SortMode::Descending => rows.sort_by_key(|r| std::cmp::Reverse(r.trend.pass_rate)),
    }

    log::debug!(
        "Filtered matrix to {} of {} tests over {} of {} runs",
        rows.len(),
        matrix.len(),
        columns.len(),
        runs.len()
    );

    MatrixView { columns, rows }
}
