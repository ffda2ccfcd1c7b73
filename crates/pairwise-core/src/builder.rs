//! Greedy covering-set construction.
//!
//! Each iteration commits one test vector:
//!
//! 1. take the heaviest unused molecule as the seed;
//! 2. order the dimension positions: seed positions first, the rest shuffled;
//! 3. fill every other position with the value that pairs best with what is
//!    already placed;
//! 4. repeat 1-3 `pool_size` times and keep the candidate that covers the most
//!    unused molecules;
//! 5. commit it and mark the molecules it covers as used.
//!
//! The loop ends when no unused molecule is left. Given the same scenario,
//! arity, pool size and seed, the output is identical run to run.

use serde::Serialize;

use crate::cancel::CancellationToken;
use crate::config::GeneratorConfig;
use crate::diagnostics::{BuildObserver, NoopObserver};
use crate::error::{PairwiseError, Result};
use crate::projection::{NamedRow, to_named_rows};
use crate::rng::VectorRng;
use crate::scenario::{AtomIndex, Scenario};
use crate::universe::MoleculeUniverse;

/// Ordered test vectors produced by one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoveringSet {
    pub arity: usize,
    pub pool_size: usize,
    pub seed: u64,
    pub vectors: Vec<Vec<AtomIndex>>,
}

impl CoveringSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub fn vectors(&self) -> &[Vec<AtomIndex>] {
        &self.vectors
    }

    #[must_use]
    pub fn into_vectors(self) -> Vec<Vec<AtomIndex>> {
        self.vectors
    }

    /// Translate every vector into `(dimension name, value)` rows.
    pub fn to_named_rows<V: Clone>(&self, scenario: &Scenario<V>) -> Result<Vec<NamedRow<V>>> {
        to_named_rows(scenario, &self.vectors)
    }
}

/// Builds covering sets from a [`MoleculeUniverse`].
#[derive(Debug, Clone)]
pub struct CoveringSetBuilder {
    pool_size: usize,
    rng: VectorRng,
    cancel: Option<CancellationToken>,
}

impl Default for CoveringSetBuilder {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        Self {
            pool_size: config.pool_size,
            rng: VectorRng::new(config.seed),
            cancel: None,
        }
    }
}

impl CoveringSetBuilder {
    /// Builder seeded and sized from `config`.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pool_size: config.pool_size,
            rng: VectorRng::new(config.seed),
            cancel: None,
        })
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = VectorRng::new(seed);
        self
    }

    /// Number of candidates built per iteration. Zero fails exactly as
    /// [`GeneratorConfig::validate`] does.
    pub fn with_pool_size(mut self, pool_size: usize) -> Result<Self> {
        GeneratorConfig::default()
            .with_pool_size(pool_size)
            .validate()?;
        self.pool_size = pool_size;
        Ok(self)
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Cover every unused molecule of `universe`.
    pub fn run<V>(
        &mut self,
        universe: &mut MoleculeUniverse,
        scenario: &Scenario<V>,
    ) -> Result<CoveringSet> {
        self.run_observed(universe, scenario, &mut NoopObserver)
    }

    /// [`run`](Self::run) with progress reported to `observer`.
    pub fn run_observed<V, O>(
        &mut self,
        universe: &mut MoleculeUniverse,
        scenario: &Scenario<V>,
        observer: &mut O,
    ) -> Result<CoveringSet>
    where
        O: BuildObserver + ?Sized,
    {
        check_scenario(universe, scenario)?;

        let mut vectors = Vec::new();
        while universe.unused_count() > 0 {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                return Err(PairwiseError::Cancelled {
                    committed: vectors.len(),
                });
            }
            let iteration = vectors.len();
            let Some(seed) = universe.best_molecule() else {
                break;
            };
            let seed_atoms = universe
                .molecule(seed)
                .map(|m| m.atoms().to_vec())
                .ok_or(PairwiseError::IndexOutOfRange {
                    index: seed,
                    len: universe.molecule_count(),
                })?;
            observer.on_seed(iteration, seed, &seed_atoms);

            let mut pool = Vec::with_capacity(self.pool_size);
            let mut captured = Vec::with_capacity(self.pool_size);
            for candidate in 0..self.pool_size {
                let vector = self.single_vector(universe, &seed_atoms)?;
                let count = universe.molecules_captured(&vector);
                observer.on_candidate(iteration, candidate, &vector, count);
                pool.push(vector);
                captured.push(count);
            }

            let winner = pool.swap_remove(self.select_best(&captured));
            let newly_covered = universe.update_all_counts(&winner)?;
            debug_assert!(newly_covered > 0, "committed vector covered nothing");
            observer.on_commit(iteration, &winner, newly_covered, universe.unused_count());
            vectors.push(winner);
        }

        Ok(CoveringSet {
            arity: universe.arity(),
            pool_size: self.pool_size,
            seed: self.rng.seed(),
            vectors,
        })
    }

    /// One candidate vector built around the seed molecule's atoms.
    pub fn single_vector(
        &mut self,
        universe: &MoleculeUniverse,
        seed_atoms: &[AtomIndex],
    ) -> Result<Vec<AtomIndex>> {
        let dimensions = universe.parameter_set_count();
        let mut vector = vec![0; dimensions];
        let mut seed_positions = Vec::with_capacity(seed_atoms.len());
        for &atom in seed_atoms {
            let position = universe
                .parameter_owner(atom)
                .ok_or(PairwiseError::IndexOutOfRange {
                    index: atom,
                    len: universe.value_count(),
                })?;
            vector[position] = atom;
            seed_positions.push(position);
        }

        let ordering = self.parameter_ordering(dimensions, &seed_positions);
        let mut placed = seed_atoms.to_vec();
        for &position in &ordering[seed_positions.len()..] {
            let values = universe
                .legal_values(position)
                .ok_or(PairwiseError::IndexOutOfRange {
                    index: position,
                    len: dimensions,
                })?;
            let mut best = values.start;
            let mut best_score = 0;
            for candidate in values {
                let score = universe.fill_score(candidate, &placed);
                if score > best_score {
                    best = candidate;
                    best_score = score;
                }
            }
            vector[position] = best;
            placed.push(best);
        }
        Ok(vector)
    }

    /// Visitation order over `0..dimensions`: `seed_positions` as given, then
    /// the remaining positions in shuffled order.
    pub fn parameter_ordering(&mut self, dimensions: usize, seed_positions: &[usize]) -> Vec<usize> {
        let mut ordering = Vec::with_capacity(dimensions);
        ordering.extend_from_slice(seed_positions);
        ordering.extend((0..dimensions).filter(|p| !seed_positions.contains(p)));
        self.rng.shuffle_tail(&mut ordering, seed_positions.len());
        ordering
    }

    /// Random default, replaced only by a strictly higher capture count.
    fn select_best(&mut self, captured: &[usize]) -> usize {
        let mut best = self.rng.pick_index(captured.len());
        for (index, &count) in captured.iter().enumerate() {
            if count > captured[best] {
                best = index;
            }
        }
        best
    }
}

fn check_scenario<V>(universe: &MoleculeUniverse, scenario: &Scenario<V>) -> Result<()> {
    let same_layout = scenario.parameter_set_count() == universe.parameter_set_count()
        && scenario
            .legal_value_groups()
            .iter()
            .enumerate()
            .all(|(d, group)| universe.legal_values(d).as_ref() == Some(group));
    if same_layout {
        Ok(())
    } else {
        Err(PairwiseError::ScenarioMismatch {
            expected: universe.value_count(),
            actual: scenario.value_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(sizes: &[usize]) -> Scenario<usize> {
        Scenario::from_dimensions(
            sizes
                .iter()
                .enumerate()
                .map(|(d, &n)| (format!("Param{d}"), (0..n).collect::<Vec<_>>())),
        )
        .unwrap()
    }

    #[test]
    fn ordering_starts_with_the_seed_positions() {
        let mut builder = CoveringSetBuilder::default();
        for _ in 0..10 {
            let ordering = builder.parameter_ordering(6, &[0, 3]);
            assert_eq!(ordering[0], 0);
            assert_eq!(ordering[1], 3);
            let mut sorted = ordering.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn single_vector_keeps_seed_atoms_in_place() {
        let s = scenario(&[2, 4, 3, 2]);
        let universe = MoleculeUniverse::build(&s, 2).unwrap();
        let mut builder = CoveringSetBuilder::default();
        let vector = builder.single_vector(&universe, &[0, 9]).unwrap();
        assert_eq!(vector.len(), 4);
        assert_eq!(vector[0], 0);
        assert_eq!(vector[3], 9);
        for (position, &atom) in vector.iter().enumerate() {
            assert_eq!(universe.parameter_owner(atom), Some(position));
        }
        // On a fresh universe every value ties, so each slot keeps its first.
        assert_eq!(vector, vec![0, 2, 6, 9]);
        assert_eq!(universe.molecules_captured(&vector), 6);
    }

    #[test]
    fn fill_ties_keep_the_first_best_value() {
        let s = scenario(&[2, 4, 3, 2]);
        let mut universe = MoleculeUniverse::build(&s, 2).unwrap();
        universe.update_all_counts(&[0, 2, 6, 9]).unwrap();
        // Next to [0, 10], value 2 scores 1 while 3, 4 and 5 all score 2.
        // Value 6 trails 7 and 8 the same way.
        assert_eq!(universe.fill_score(2, &[0, 10]), 1);
        assert_eq!(universe.fill_score(3, &[0, 10]), 2);
        assert_eq!(universe.fill_score(5, &[0, 10]), 2);
        for seed in 0..8 {
            let mut builder = CoveringSetBuilder::default().with_seed(seed);
            let vector = builder.single_vector(&universe, &[0, 10]).unwrap();
            assert_eq!(vector, vec![0, 3, 7, 10], "seed {seed}");
        }
    }

    #[test]
    fn selection_prefers_strictly_larger_capture() {
        let mut builder = CoveringSetBuilder::default();
        assert_eq!(builder.select_best(&[1, 4, 2, 4]), 1);
        let tied = builder.select_best(&[3, 3, 3]);
        assert!(tied < 3);
    }

    #[test]
    fn tied_capture_counts_are_broken_by_the_seed() {
        let picks: std::collections::HashSet<usize> = (0..16)
            .map(|seed| {
                CoveringSetBuilder::default()
                    .with_seed(seed)
                    .select_best(&[3, 3, 3])
            })
            .collect();
        assert!(picks.len() > 1, "{picks:?}");
        assert!(picks.iter().all(|&i| i < 3));
    }

    #[test]
    fn zero_pool_size_is_rejected_everywhere() {
        let config = GeneratorConfig::default().with_pool_size(0);
        let from_config = CoveringSetBuilder::new(&config).unwrap_err();
        let from_builder = CoveringSetBuilder::default().with_pool_size(0).unwrap_err();
        assert_eq!(from_config, from_builder);
        assert!(matches!(
            from_builder,
            PairwiseError::InvalidConfig {
                field: "pool_size",
                ..
            }
        ));
        let builder = CoveringSetBuilder::default().with_pool_size(4).unwrap();
        assert_eq!(builder.pool_size(), 4);
    }

    #[test]
    fn mismatched_scenario_is_rejected() {
        let mut universe = MoleculeUniverse::build(&scenario(&[2, 3]), 2).unwrap();
        let err = CoveringSetBuilder::default()
            .run(&mut universe, &scenario(&[3, 3]))
            .unwrap_err();
        assert_eq!(
            err,
            PairwiseError::ScenarioMismatch {
                expected: 5,
                actual: 6
            }
        );
        assert_eq!(universe.unused_count(), 6);
    }

    #[test]
    fn drained_universe_yields_no_vectors() {
        let s = scenario(&[2, 2]);
        let mut universe = MoleculeUniverse::build(&s, 2).unwrap();
        let mut builder = CoveringSetBuilder::default();
        assert_eq!(builder.run(&mut universe, &s).unwrap().len(), 4);
        assert!(builder.run(&mut universe, &s).unwrap().is_empty());
    }
}
