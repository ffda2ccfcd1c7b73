//! Error taxonomy for scenario construction, universe building and vector
//! assembly.

use thiserror::Error;

use crate::scenario::AtomIndex;

/// Errors raised by the covering-set core.
///
/// `InvalidArity` and `InvalidParameterSet` are caller errors. `IndexOutOfRange`
/// is always an internal invariant violation and aborts the whole build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairwiseError {
    #[error("arity {arity} is outside 1..={dimensions} for a scenario with {dimensions} parameter set(s)")]
    InvalidArity { arity: usize, dimensions: usize },
    #[error("parameter set '{name}' has no values")]
    InvalidParameterSet { name: String },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("test vector has {actual} position(s), expected {expected}")]
    VectorShape { expected: usize, actual: usize },
    #[error("atom {atom} placed at position {position} belongs to parameter set {owner}")]
    MisplacedAtom {
        atom: AtomIndex,
        position: usize,
        owner: usize,
    },
    #[error("scenario has {actual} value(s) but the universe was built over {expected}")]
    ScenarioMismatch { expected: usize, actual: usize },
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("value '{value}' is not legal for parameter set '{dimension}'")]
    UnknownValue { dimension: String, value: String },
    #[error("row has no value for parameter set '{dimension}'")]
    MissingDimension { dimension: String },
    #[error("build cancelled after {committed} committed vector(s)")]
    Cancelled { committed: usize },
}

pub type Result<T> = std::result::Result<T, PairwiseError>;
