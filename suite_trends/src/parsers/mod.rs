//! Parsers for historical end-to-end report documents
//!
//! This module turns a report document into the typed `TestReport` the
//! analysis engine works on.

pub mod mochawesome_json;
pub mod types;

// Re-export commonly used types
pub use mochawesome_json::MochawesomeJsonParser;
pub use types::{Parser, ReportError, RunRecord, RunStats, SuiteResult, TestOutcome, TestReport};
