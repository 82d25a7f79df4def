use std::collections::BTreeMap;

use crate::data::SuiteKind;
use crate::parsers::types::{Parser, ReportError, RunRecord, TestReport};

/// Parser for a JSON document holding mochawesome run reports per suite kind:
/// `{ "<kind>": { "<run key>": { "stats": {..}, "results": [..] } } }`
pub struct MochawesomeJsonParser;

impl Parser for MochawesomeJsonParser {
    fn parse(&self, input: &str) -> Result<TestReport, ReportError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(input)?;

        let mut suites: BTreeMap<SuiteKind, BTreeMap<String, RunRecord>> =
            SuiteKind::ALL.into_iter().map(|k| (k, BTreeMap::new())).collect();

        for (key, value) in raw {
            let Some(kind) = SuiteKind::from_key(&key) else {
                log::warn!("Ignoring unknown top-level key '{key}'");
                continue;
            };
            let runs: BTreeMap<String, RunRecord> = serde_json::from_value(value)?;
            log::debug!("Parsed {} runs for {}", runs.len(), kind);
            suites.insert(kind, runs);
        }

        Ok(TestReport { suites })
    }
}
