//! Load report documents from stdin or a file.

use std::{
    io::{self, Read},
    path::Path,
};

use log::info;

use crate::data::SuiteKind;
use crate::parsers::{MochawesomeJsonParser, Parser, ReportError, TestReport};

/// Read the raw document from `path`, `-` meaning stdin.
pub fn read_input(path: &Path) -> Result<String, ReportError> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| ReportError::Unreadable {
                path: "<stdin>".to_string(),
                source,
            })?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).map_err(|source| ReportError::Unreadable {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Read and parse the report document at `path`.
pub fn load_report(path: &Path) -> Result<TestReport, ReportError> {
    let input = read_input(path)?;
    let report = MochawesomeJsonParser.parse(&input)?;
    info!(
        "Loaded {} smoke, {} UI UAT and {} pricing override runs",
        report.run_count(SuiteKind::SmokeTests),
        report.run_count(SuiteKind::UiUatTests),
        report.run_count(SuiteKind::PricingOverride)
    );
    Ok(report)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_report_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        fs::write(
            &path,
            r#"{
              "smokeTests": {
                "r1": {
                  "stats": {"start": "2025-07-01T00:00:00Z", "tests": 1, "passes": 1, "passPercent": 100}
                }
              }
            }"#,
        )
        .unwrap();

        let report = load_report(&path).unwrap();
        assert_eq!(report.run_count(SuiteKind::SmokeTests), 1);
        assert_eq!(report.run_count(SuiteKind::UiUatTests), 0);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");
        match load_report(&path) {
            Err(ReportError::Unreadable { path: p, .. }) => assert!(p.ends_with("absent.json")),
            other => panic!("expected unreadable error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_report(&path), Err(ReportError::Malformed(_))));
    }
}
