pub mod cli;
pub mod config;
pub mod data;
pub mod defaults;
pub mod filter;
pub mod format;
pub mod import;
pub mod matrix;
pub mod normalize;
pub mod parsers;
pub mod reporting;
pub mod serialization;
pub mod series;
pub mod stats;
pub mod trend;

// Test helpers module - made public for use in unit tests, integration tests, and benchmarks
// This is conditionally compiled to avoid including test code in release builds
#[doc(hidden)]
#[cfg(any(test, doctest, feature = "test-helpers"))]
pub mod test_helpers;
