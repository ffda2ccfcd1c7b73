//! Harness error types.

use pairwise_core::PairwiseError;
use thiserror::Error;

/// Problems in a textual scenario.
#[derive(Debug, Error)]
pub enum ScenarioTextError {
    #[error("line {line}: expected 'Name: value, value', found '{text}'")]
    MissingSeparator { line: usize, text: String },
    #[error("line {line}: parameter set name is empty")]
    EmptyName { line: usize },
    #[error("scenario defines no parameter sets")]
    Empty,
    #[error("line {line}: {source}")]
    Core {
        line: usize,
        #[source]
        source: PairwiseError,
    },
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scenario: {0}")]
    Scenario(#[from] ScenarioTextError),
    #[error(transparent)]
    Core(#[from] PairwiseError),
    #[error("rows: {0}")]
    Rows(String),
}
