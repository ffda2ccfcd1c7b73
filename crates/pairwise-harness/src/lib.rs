//! Adapters around `pairwise-core`.
//!
//! This crate provides:
//! - Scenario text parsing (`Name: v1, v2` per line)
//! - Structured JSONL build logs and their validator
//! - Covering-set reports (JSON, TSV, markdown) with a SHA-256 row digest
//! - The `pairwise` command-line entrypoint

pub mod error;
pub mod report;
pub mod runner;
pub mod scenario_text;
pub mod structured_log;

pub use error::{HarnessError, ScenarioTextError};
pub use report::CoveringReport;
pub use runner::{CountSummary, count_summary, generate_report, read_input, verify_rows};
pub use scenario_text::parse_scenario;
