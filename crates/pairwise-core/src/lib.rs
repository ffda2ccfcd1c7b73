//! # pairwise-core
//!
//! Greedy N-wise covering-set generation for combinatorial test design.
//!
//! A [`Scenario`] lists independent input dimensions and their values. For a
//! chosen arity `K`, every combination of `K` values drawn from `K` distinct
//! dimensions is a *molecule*; [`MoleculeUniverse`] enumerates them and tracks
//! which are still uncovered. [`CoveringSetBuilder`] then emits test vectors
//! until every molecule appears in at least one vector.
//!
//! ```
//! use pairwise_core::{GeneratorConfig, Scenario, generate, verify_coverage};
//!
//! let scenario = Scenario::from_dimensions([
//!     ("Browser", vec!["Chrome", "Firefox", "IE"]),
//!     ("Page", vec!["Home", "Search"]),
//!     ("Locale", vec!["en", "de"]),
//! ])
//! .unwrap();
//! let set = generate(&scenario, &GeneratorConfig::default()).unwrap();
//! assert!(verify_coverage(&scenario, 2, set.vectors()).unwrap().is_complete());
//! ```
//!
//! Output is deterministic for a given scenario, arity, pool size and seed.

pub mod builder;
pub mod cancel;
pub mod combinations;
pub mod config;
pub mod coverage;
pub mod diagnostics;
pub mod error;
pub mod molecule;
pub mod projection;
pub mod rng;
pub mod scenario;
pub mod search;
pub mod universe;

pub use builder::{CoveringSet, CoveringSetBuilder};
pub use cancel::CancellationToken;
pub use config::{GeneratorConfig, parse_seed};
pub use coverage::{CoverageCheck, vectors_from_named_rows, verify_coverage};
pub use diagnostics::{BuildObserver, NoopObserver};
pub use error::{PairwiseError, Result};
pub use molecule::{Molecule, MoleculeId};
pub use projection::{NamedRow, to_named_rows};
pub use scenario::{AtomIndex, ParameterSet, Scenario};
pub use universe::MoleculeUniverse;

/// Build the universe for `config.arity` and cover it in one call.
pub fn generate<V>(scenario: &Scenario<V>, config: &GeneratorConfig) -> Result<CoveringSet> {
    let mut builder = CoveringSetBuilder::new(config)?;
    let mut universe = MoleculeUniverse::build(scenario, config.arity)?;
    builder.run(&mut universe, scenario)
}
