use std::fmt::Display;

use readable::num::*;

use crate::data::{EpochMillis, RunSummary, SuiteKind, MS_PER_DAY};

/// `round(100 * part / whole)` with halves rounded up, in integer arithmetic.
/// `whole` must be non-zero.
pub fn rounded_percent(part: u64, whole: u64) -> u32 {
    debug_assert!(whole > 0);
    ((200 * part + whole) / (2 * whole)) as u32
}

/// Pass rate over the runs started within a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    pub days: u32,
    pub passes: u64,
    pub total: u64,
    /// Number of runs in the window
    pub count: usize,
    /// `None` when the window holds no tests
    pub pct: Option<u32>,
}

impl Display for WindowStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pct {
            Some(pct) => write!(
                f,
                "Last {}d: {}% ({} runs)",
                self.days,
                pct,
                Unsigned::from(self.count)
            ),
            None => write!(f, "Last {}d: no data", self.days),
        }
    }
}

/// Aggregate the runs whose start lies within `days` days before `now`.
pub fn window_stats(runs: &[RunSummary], now: EpochMillis, days: u32) -> WindowStats {
    let from = now - i64::from(days) * MS_PER_DAY;
    let (passes, total, count) = runs
        .iter()
        .filter(|r| r.start >= from)
        .fold((0u64, 0u64, 0usize), |(p, t, c), r| {
            (p + u64::from(r.passes), t + u64::from(r.total), c + 1)
        });

    WindowStats {
        days,
        passes,
        total,
        count,
        pct: (total > 0).then(|| rounded_percent(passes, total)),
    }
}

/// Independent, overlapping windows: a run inside the 3-day window is also
/// part of every longer one.
pub fn rolling_windows(runs: &[RunSummary], now: EpochMillis, windows: &[u32]) -> Vec<WindowStats> {
    windows
        .iter()
        .map(|days| window_stats(runs, now, *days))
        .collect()
}

/// Pass rate over all runs of a suite kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallStats {
    pub passes: u64,
    pub total: u64,
    pub runs: usize,
    pub pct: Option<u32>,
}

impl Display for OverallStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pct {
            Some(pct) => write!(
                f,
                "Overall: {}% across {} runs",
                pct,
                Unsigned::from(self.runs)
            ),
            None => write!(f, "Overall: no data"),
        }
    }
}

pub fn overall_stats(runs: &[RunSummary]) -> OverallStats {
    let passes = runs.iter().map(|r| u64::from(r.passes)).sum();
    let total = runs.iter().map(|r| u64::from(r.total)).sum();
    OverallStats {
        passes,
        total,
        runs: runs.len(),
        pct: (total > 0).then(|| rounded_percent(passes, total)),
    }
}

/// Everything shown on a suite kind's health card.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteHealth {
    pub kind: SuiteKind,
    pub latest: Option<RunSummary>,
    pub overall: OverallStats,
    pub windows: Vec<WindowStats>,
}

/// `runs` must be sorted ascending by start.
pub fn suite_health(
    kind: SuiteKind,
    runs: &[RunSummary],
    now: EpochMillis,
    windows: &[u32],
) -> SuiteHealth {
    SuiteHealth {
        kind,
        latest: runs.last().cloned(),
        overall: overall_stats(runs),
        windows: rolling_windows(runs, now, windows),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run_at(now: EpochMillis, day_offset: i64, total: u32, passes: u32) -> RunSummary {
        RunSummary {
            key: format!("d{day_offset}"),
            start: now + day_offset * MS_PER_DAY,
            total,
            passes,
            fails: total - passes,
            pass_percent: 0.0,
        }
    }

    fn sample(now: EpochMillis) -> Vec<RunSummary> {
        vec![
            run_at(now, -29, 10, 9),
            run_at(now, -10, 10, 5),
            run_at(now, -5, 10, 8),
            run_at(now, -1, 10, 10),
        ]
    }

    #[test]
    fn test_rounded_percent() {
        assert_eq!(rounded_percent(0, 1), 0);
        assert_eq!(rounded_percent(1, 1), 100);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(rounded_percent(18, 20), 90);
    }

    #[test]
    fn test_window_overlap() {
        let now = 1_750_000_000_000;
        let runs = sample(now);

        let week = window_stats(&runs, now, 7);
        assert_eq!(week.count, 2);
        assert_eq!(week.passes, 18);
        assert_eq!(week.total, 20);
        assert_eq!(week.pct, Some(90));

        let month = window_stats(&runs, now, 30);
        assert_eq!(month.count, 4);
        assert_eq!(month.passes, 32);
        assert_eq!(month.total, 40);
        assert_eq!(month.pct, Some(80));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let now = 1_750_000_000_000;
        let runs = vec![run_at(now, -3, 4, 1)];
        assert_eq!(window_stats(&runs, now, 3).count, 1);
        assert_eq!(window_stats(&runs, now, 2).count, 0);
    }

    #[test]
    fn test_empty_window_has_no_data() {
        let now = 1_750_000_000_000;
        let stats = window_stats(&sample(now), now, 0);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.pct, None);
        assert_eq!(stats.to_string(), "Last 0d: no data");

        // Runs without tests are counted but give no percentage
        let runs = vec![run_at(now, -1, 0, 0)];
        let stats = window_stats(&runs, now, 3);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.pct, None);
    }

    #[test]
    fn test_rolling_windows_display() {
        let now = 1_750_000_000_000;
        let windows = rolling_windows(&sample(now), now, &[3, 7, 14, 30]);
        let lines: Vec<_> = windows.iter().map(|w| w.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Last 3d: 100% (1 runs)",
                "Last 7d: 90% (2 runs)",
                "Last 14d: 77% (3 runs)",
                "Last 30d: 80% (4 runs)",
            ]
        );
    }

    #[test]
    fn test_overall_stats() {
        let now = 1_750_000_000_000;
        let overall = overall_stats(&sample(now));
        assert_eq!(overall.pct, Some(80));
        assert_eq!(overall.runs, 4);
        assert_eq!(overall.to_string(), "Overall: 80% across 4 runs");

        let empty = overall_stats(&[]);
        assert_eq!(empty.pct, None);
        assert_eq!(empty.runs, 0);
    }

    #[test]
    fn test_suite_health_latest() {
        let now = 1_750_000_000_000;
        let runs = sample(now);
        let health = suite_health(SuiteKind::SmokeTests, &runs, now, &[7]);
        assert_eq!(health.latest.as_ref().map(|r| r.key.as_str()), Some("d-1"));
        assert_eq!(health.windows.len(), 1);

        let health = suite_health(SuiteKind::SmokeTests, &[], now, &[7]);
        assert!(health.latest.is_none());
        assert_eq!(health.windows[0].pct, None);
    }
}
