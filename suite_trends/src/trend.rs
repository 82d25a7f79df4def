use crate::{data::Cell, stats::rounded_percent};

/// Health of one test over the run columns currently in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrendClassification {
    /// Passes over the number of scoped runs, including runs the test was not
    /// part of.
    pub pass_rate: u32,
    /// Outcome differs between at least two adjacent executed runs
    pub is_flaky: bool,
    /// Failed in the latest run it was part of
    pub latest_fail: bool,
    /// Last transition was pass -> fail
    pub new_failure: bool,
    /// Last transition was fail -> pass
    pub recovered: bool,
}

/// Classify a test from its chronological cells over the scoped runs.
///
/// Not-run cells count toward the pass-rate denominator but are skipped when
/// looking for flips and transitions.
pub fn classify(cells: &[Cell]) -> TrendClassification {
    let passed = cells.iter().filter(|c| c.passed()).count();
    let pass_rate = rounded_percent(passed as u64, cells.len().max(1) as u64);

    let mut is_flaky = false;
    let mut latest: Option<bool> = None;
    let mut prev: Option<bool> = None;
    for outcome in cells.iter().filter_map(|c| c.observed()) {
        if latest.is_some_and(|l| l != outcome) {
            is_flaky = true;
        }
        prev = latest;
        latest = Some(outcome);
    }

    TrendClassification {
        pass_rate,
        is_flaky,
        latest_fail: latest == Some(false),
        new_failure: latest == Some(false) && prev == Some(true),
        recovered: latest == Some(true) && prev == Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Cell::{NotRun, Observed};

    fn observed(seq: &[bool]) -> Vec<Cell> {
        seq.iter().map(|p| Observed(*p)).collect()
    }

    #[test]
    fn test_flaky_definition() {
        assert!(classify(&observed(&[true, true, false, false])).is_flaky);
        assert!(!classify(&observed(&[true, true, true])).is_flaky);
        assert!(!classify(&observed(&[false])).is_flaky);
        assert!(!classify(&[]).is_flaky);
    }

    #[test]
    fn test_not_run_cells_are_skipped_for_flips() {
        // pass, -, pass is a stable sequence
        let t = classify(&[Observed(true), NotRun, Observed(true)]);
        assert!(!t.is_flaky);
        assert_eq!(t.pass_rate, 67);

        // A flip across a gap is still adjacent
        let t = classify(&[Observed(true), NotRun, NotRun, Observed(false)]);
        assert!(t.is_flaky);
        assert!(t.new_failure);
    }

    #[test]
    fn test_pass_rate_uses_scoped_run_count() {
        assert_eq!(classify(&[Observed(true), NotRun]).pass_rate, 50);
        assert_eq!(classify(&observed(&[true, false, true])).pass_rate, 67);
        assert_eq!(classify(&observed(&[true, false])).pass_rate, 50);
        assert_eq!(classify(&observed(&[false, false])).pass_rate, 0);
        assert_eq!(classify(&[]).pass_rate, 0);
        assert_eq!(classify(&[NotRun, NotRun]).pass_rate, 0);
    }

    #[test]
    fn test_latest_fail_and_transitions() {
        let t = classify(&observed(&[true, false]));
        assert!(t.latest_fail);
        assert!(t.new_failure);
        assert!(!t.recovered);

        let t = classify(&observed(&[false, true]));
        assert!(!t.latest_fail);
        assert!(!t.new_failure);
        assert!(t.recovered);

        let t = classify(&observed(&[true, false, false]));
        assert!(t.latest_fail);
        assert!(!t.new_failure);
        assert!(t.is_flaky);

        let t = classify(&[Observed(false), Observed(true), NotRun]);
        assert!(t.recovered);
        assert!(!t.latest_fail);
    }

    #[test]
    fn test_single_observation_has_no_transition() {
        for cells in [vec![Observed(false)], vec![NotRun, Observed(true), NotRun]] {
            let t = classify(&cells);
            assert!(!t.is_flaky);
            assert!(!t.new_failure);
            assert!(!t.recovered);
        }
        assert!(classify(&[Observed(false)]).latest_fail);
    }

    #[test]
    fn test_absent_from_all_runs() {
        let t = classify(&[NotRun, NotRun, NotRun]);
        assert_eq!(t, TrendClassification::default());
    }

    #[test]
    fn test_new_failure_and_recovered_are_exclusive() {
        // Every boolean sequence up to length 5, with and without gaps
        for len in 0..=5u32 {
            for bits in 0..(1u32 << len) {
                let mut cells: Vec<Cell> = (0..len).map(|i| Observed(bits & (1 << i) != 0)).collect();
                let t = classify(&cells);
                assert!(!(t.new_failure && t.recovered));
                cells.insert(cells.len() / 2, NotRun);
                let t = classify(&cells);
                assert!(!(t.new_failure && t.recovered));
            }
        }
    }
}
