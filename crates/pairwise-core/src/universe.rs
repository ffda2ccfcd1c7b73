//! Molecule universe: every combination that must be covered, plus the
//! bookkeeping that tracks which ones are still outstanding.
//!
//! Molecules live once in an arena indexed by [`MoleculeId`]. "Unused" is the
//! arena's `used == false` subset; nothing is ever physically removed. The
//! [`CoverageIndex`] maps an atom tuple to its arena slot while the molecule
//! is unused, so covering a molecule costs O(1).
//!
//! Invariants maintained by every mutation:
//! - `unused_weight[a]` equals the number of unused molecules containing `a`.
//! - an index entry exists iff the corresponding molecule is unused.
//! - `unused_count` equals the number of arena entries with `used == false`.

use std::collections::HashMap;
use std::ops::Range;

use crate::combinations::{combination_size, dimension_combinations, expand_atoms};
use crate::error::{PairwiseError, Result};
use crate::molecule::{Molecule, MoleculeId};
use crate::scenario::{AtomIndex, Scenario};
use crate::search::CoverageIndex;

/// Full molecule catalogue for one scenario and arity.
#[derive(Debug, Clone)]
pub struct MoleculeUniverse {
    arity: usize,
    groups: Vec<Range<AtomIndex>>,
    owners: Vec<usize>,
    combinations: Vec<Vec<usize>>,
    molecules: Vec<Molecule>,
    unused_count: usize,
    /// No molecule below this arena slot is unused.
    first_unused: MoleculeId,
    index: CoverageIndex,
    unused_weight: Vec<usize>,
    /// Arity > 2 only: unused molecules containing both atoms of a pair.
    pair_links: HashMap<(AtomIndex, AtomIndex), usize>,
}

impl MoleculeUniverse {
    /// Enumerate every molecule of `arity` atoms over `scenario`.
    ///
    /// Fails with [`PairwiseError::InvalidArity`] before allocating anything
    /// when `arity` is outside `1..=parameter_set_count`.
    pub fn build<V>(scenario: &Scenario<V>, arity: usize) -> Result<Self> {
        let combinations = dimension_combinations(scenario.parameter_set_count(), arity)?;
        let groups = scenario.legal_value_groups().to_vec();
        let owners = scenario.parameter_owners().to_vec();
        let value_count = owners.len();

        let expected = combinations
            .iter()
            .map(|combo| combination_size(&groups, combo))
            .fold(0u64, u64::saturating_add);
        let capacity = usize::try_from(expected).unwrap_or(usize::MAX);

        let mut molecules = Vec::with_capacity(capacity);
        let mut index = CoverageIndex::for_arity(arity, value_count, capacity);
        for combo in &combinations {
            let combo_groups: Vec<Range<AtomIndex>> =
                combo.iter().map(|&d| groups[d].clone()).collect();
            for atoms in expand_atoms(&combo_groups) {
                if let Some(&atom) = atoms.iter().find(|&&a| a >= value_count) {
                    return Err(PairwiseError::IndexOutOfRange {
                        index: atom,
                        len: value_count,
                    });
                }
                index.insert(&atoms, molecules.len());
                molecules.push(Molecule::new(atoms));
            }
        }

        let mut universe = Self {
            arity,
            groups,
            owners,
            combinations,
            unused_count: molecules.len(),
            molecules,
            first_unused: 0,
            index,
            unused_weight: vec![0; value_count],
            pair_links: HashMap::new(),
        };
        universe.process_unused_values();
        Ok(universe)
    }

    /// Number of molecules `build` would produce, without building them.
    pub fn count_molecules<V>(scenario: &Scenario<V>, arity: usize) -> Result<u64> {
        let combinations = dimension_combinations(scenario.parameter_set_count(), arity)?;
        let groups = scenario.legal_value_groups();
        Ok(combinations
            .iter()
            .map(|combo| combination_size(groups, combo))
            .fold(0u64, u64::saturating_add))
    }

    /// Recompute per-atom weights (and pair links) from the unused molecules.
    pub fn process_unused_values(&mut self) {
        self.unused_weight.iter_mut().for_each(|w| *w = 0);
        self.pair_links.clear();
        let track_pairs = self.arity > 2;

        for molecule in self.molecules.iter().filter(|m| !m.is_used()) {
            let atoms = molecule.atoms();
            for &atom in atoms {
                self.unused_weight[atom] += 1;
            }
            if track_pairs {
                for (i, &a) in atoms.iter().enumerate() {
                    for &b in &atoms[i + 1..] {
                        *self.pair_links.entry(pair_key(a, b)).or_insert(0) += 1;
                    }
                }
            }
        }
    }

    /// Mark every molecule captured by a committed vector as used.
    ///
    /// Returns the number of molecules newly covered. Molecules that were
    /// already used are skipped, so applying the same vector twice is a no-op
    /// the second time. The vector is validated before anything changes.
    pub fn update_all_counts(&mut self, vector: &[AtomIndex]) -> Result<usize> {
        self.validate_vector(vector)?;

        let mut covered = 0;
        let mut probe = Vec::with_capacity(self.arity);
        for c in 0..self.combinations.len() {
            probe.clear();
            probe.extend(self.combinations[c].iter().map(|&position| vector[position]));
            if let Some(id) = self.index.remove(&probe) {
                self.retire(id);
                covered += 1;
            }
        }
        Ok(covered)
    }

    fn retire(&mut self, id: MoleculeId) {
        let newly_used = self.molecules[id].mark_used();
        debug_assert!(newly_used, "index entry outlived molecule {id}");

        let atoms = self.molecules[id].atoms();
        for &atom in atoms {
            self.unused_weight[atom] -= 1;
        }
        if self.arity > 2 {
            for (i, &a) in atoms.iter().enumerate() {
                for &b in &atoms[i + 1..] {
                    if let Some(links) = self.pair_links.get_mut(&pair_key(a, b)) {
                        *links -= 1;
                    }
                }
            }
        }
        self.unused_count -= 1;

        while self
            .molecules
            .get(self.first_unused)
            .is_some_and(Molecule::is_used)
        {
            self.first_unused += 1;
        }
    }

    /// Unused molecule with the highest summed atom weight.
    ///
    /// Scans in arena order; the first molecule reaching the maximum wins.
    #[must_use]
    pub fn best_molecule(&self) -> Option<MoleculeId> {
        let mut best: Option<(MoleculeId, usize)> = None;
        for (id, molecule) in self.unused_molecules() {
            let weight = self.molecule_weight(molecule);
            if best.is_none_or(|(_, top)| weight > top) {
                best = Some((id, weight));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Sum of `unused_weight` over the atoms of a molecule.
    #[must_use]
    pub fn molecule_weight(&self, molecule: &Molecule) -> usize {
        molecule
            .atoms()
            .iter()
            .map(|&atom| self.unused_weight[atom])
            .sum()
    }

    /// How many unused molecules `vector` would cover. Pure query.
    ///
    /// Positions beyond the end of `vector` contribute nothing.
    #[must_use]
    pub fn molecules_captured(&self, vector: &[AtomIndex]) -> usize {
        let mut probe = Vec::with_capacity(self.arity);
        self.combinations
            .iter()
            .filter(|combo| {
                probe.clear();
                for &position in *combo {
                    match vector.get(position) {
                        Some(&atom) => probe.push(atom),
                        None => return false,
                    }
                }
                self.index.contains(&probe)
            })
            .count()
    }

    /// Score of placing `candidate` next to the atoms already in a vector.
    ///
    /// Pairwise: number of placed atoms `p` with `{candidate, p}` still
    /// unused. Higher arities count placed atoms that still share at least one
    /// unused molecule with `candidate`. Arity one scores whether the
    /// candidate itself is still unused.
    #[must_use]
    pub fn fill_score(&self, candidate: AtomIndex, placed: &[AtomIndex]) -> usize {
        match self.arity {
            1 => usize::from(self.index.contains(&[candidate])),
            2 => placed
                .iter()
                .filter(|&&p| self.index.contains(&[candidate, p]))
                .count(),
            _ => placed
                .iter()
                .filter(|&&p| {
                    self.pair_links
                        .get(&pair_key(candidate, p))
                        .is_some_and(|&links| links > 0)
                })
                .count(),
        }
    }

    fn validate_vector(&self, vector: &[AtomIndex]) -> Result<()> {
        if vector.len() != self.groups.len() {
            return Err(PairwiseError::VectorShape {
                expected: self.groups.len(),
                actual: vector.len(),
            });
        }
        for (position, &atom) in vector.iter().enumerate() {
            let owner = *self
                .owners
                .get(atom)
                .ok_or(PairwiseError::IndexOutOfRange {
                    index: atom,
                    len: self.owners.len(),
                })?;
            if owner != position {
                return Err(PairwiseError::MisplacedAtom {
                    atom,
                    position,
                    owner,
                });
            }
        }
        Ok(())
    }

    /// Unused molecules in arena order.
    pub fn unused_molecules(&self) -> impl Iterator<Item = (MoleculeId, &Molecule)> + '_ {
        self.molecules
            .iter()
            .enumerate()
            .skip(self.first_unused)
            .filter(|(_, m)| !m.is_used())
    }

    #[must_use]
    pub fn all_molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    #[must_use]
    pub fn molecule(&self, id: MoleculeId) -> Option<&Molecule> {
        self.molecules.get(id)
    }

    #[must_use]
    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    #[must_use]
    pub fn unused_count(&self) -> usize {
        self.unused_count
    }

    /// Whether the molecule with these atoms (any order) is still unused.
    #[must_use]
    pub fn is_unused(&self, atoms: &[AtomIndex]) -> bool {
        self.index.contains(atoms)
    }

    #[must_use]
    pub fn unused_weight(&self, atom: AtomIndex) -> usize {
        self.unused_weight.get(atom).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn unused_weights(&self) -> &[usize] {
        &self.unused_weight
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[must_use]
    pub fn dimension_combinations(&self) -> &[Vec<usize>] {
        &self.combinations
    }

    #[must_use]
    pub fn parameter_set_count(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn value_count(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn legal_values(&self, dimension: usize) -> Option<Range<AtomIndex>> {
        self.groups.get(dimension).cloned()
    }

    #[must_use]
    pub fn parameter_owner(&self, atom: AtomIndex) -> Option<usize> {
        self.owners.get(atom).copied()
    }

    /// Product of every dimension's value count, saturating.
    #[must_use]
    pub fn full_combination_count(&self) -> u64 {
        self.groups
            .iter()
            .fold(1u64, |acc, g| acc.saturating_mul(g.len() as u64))
    }
}

fn pair_key(a: AtomIndex, b: AtomIndex) -> (AtomIndex, AtomIndex) {
    if a <= b { (a, b) } else { (b, a) }
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

    fn recount(universe: &MoleculeUniverse) -> Vec<usize> {
        let mut weights = vec![0; universe.value_count()];
        for (_, molecule) in universe.unused_molecules() {
            for &atom in molecule.atoms() {
                weights[atom] += 1;
            }
        }
        weights
    }

    #[test]
    fn two_by_three_molecules() {
        let universe = MoleculeUniverse::build(&scenario(&[2, 3]), 2).unwrap();
        let atoms: Vec<Vec<usize>> = universe
            .all_molecules()
            .iter()
            .map(|m| m.atoms().to_vec())
            .collect();
        assert_eq!(
            atoms,
            vec![
                vec![0, 2],
                vec![0, 3],
                vec![0, 4],
                vec![1, 2],
                vec![1, 3],
                vec![1, 4]
            ]
        );
        assert_eq!(universe.unused_count(), 6);
    }

    #[test]
    fn pairwise_count_for_four_dimensions() {
        let s = scenario(&[2, 4, 3, 2]);
        let universe = MoleculeUniverse::build(&s, 2).unwrap();
        assert_eq!(universe.molecule_count(), 44);
        assert_eq!(MoleculeUniverse::count_molecules(&s, 2).unwrap(), 44);
        assert_eq!(universe.full_combination_count(), 48);
    }

    #[test]
    fn one_value_against_many() {
        let universe = MoleculeUniverse::build(&scenario(&[1, 8]), 2).unwrap();
        assert_eq!(universe.molecule_count(), 8);
        let universe = MoleculeUniverse::build(&scenario(&[8, 1]), 2).unwrap();
        assert_eq!(universe.molecule_count(), 8);
    }

    #[test]
    fn higher_arity_counts() {
        let s = scenario(&[2, 4, 3, 5, 2, 3, 5]);
        assert_eq!(MoleculeUniverse::count_molecules(&s, 3).unwrap(), 1328);
        assert_eq!(MoleculeUniverse::count_molecules(&s, 4).unwrap(), 4281);
        let universe = MoleculeUniverse::build(&s, 3).unwrap();
        assert_eq!(universe.molecule_count(), 1328);
        assert_eq!(universe.dimension_combinations().len(), 35);
    }

    #[test]
    fn invalid_arity_is_rejected() {
        let s = scenario(&[2, 3]);
        assert_eq!(
            MoleculeUniverse::build(&s, 3).unwrap_err(),
            PairwiseError::InvalidArity {
                arity: 3,
                dimensions: 2
            }
        );
        assert!(MoleculeUniverse::build(&s, 0).is_err());
        assert!(MoleculeUniverse::build(&Scenario::<u8>::new(), 1).is_err());
    }

    #[test]
    fn initial_weights_count_molecules_per_atom() {
        let universe = MoleculeUniverse::build(&scenario(&[2, 4, 3, 2]), 2).unwrap();
        // Param0 atoms pair with 4 + 3 + 2 values.
        assert_eq!(universe.unused_weight(0), 9);
        assert_eq!(universe.unused_weight(2), 7);
        assert_eq!(universe.unused_weight(6), 8);
        assert_eq!(universe.unused_weight(9), 9);
        assert_eq!(universe.unused_weights(), recount(&universe).as_slice());
    }

    #[test]
    fn best_molecule_prefers_heaviest_then_first() {
        let universe = MoleculeUniverse::build(&scenario(&[2, 4, 3, 2]), 2).unwrap();
        let best = universe.best_molecule().unwrap();
        assert_eq!(universe.molecule(best).unwrap().atoms(), &[0, 9]);
    }

    #[test]
    fn covering_the_best_molecule_removes_it() {
        let mut universe = MoleculeUniverse::build(&scenario(&[2, 4, 3, 2]), 2).unwrap();
        let best = universe.best_molecule().unwrap();
        assert_eq!(universe.molecule(best).unwrap().atoms(), &[0, 9]);

        let vector = [0, 2, 6, 9];
        assert_eq!(universe.molecules_captured(&vector), 6);
        assert_eq!(universe.update_all_counts(&vector).unwrap(), 6);
        assert!(universe.molecule(best).unwrap().is_used());
        assert!(!universe.is_unused(&[0, 9]));
        assert_eq!(universe.unused_count(), 38);
        assert_eq!(universe.unused_weights(), recount(&universe).as_slice());

        // Second application changes nothing.
        assert_eq!(universe.update_all_counts(&vector).unwrap(), 0);
        assert_eq!(universe.unused_count(), 38);
        assert_eq!(universe.unused_weights(), recount(&universe).as_slice());
    }

    #[test]
    fn captured_count_is_pure() {
        let universe = MoleculeUniverse::build(&scenario(&[2, 3, 2]), 2).unwrap();
        let before = universe.unused_count();
        assert_eq!(universe.molecules_captured(&[0, 2, 5]), 3);
        assert_eq!(universe.unused_count(), before);
    }

    #[test]
    fn malformed_vectors_are_rejected_before_mutation() {
        let mut universe = MoleculeUniverse::build(&scenario(&[2, 3]), 2).unwrap();
        assert_eq!(
            universe.update_all_counts(&[0]),
            Err(PairwiseError::VectorShape {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            universe.update_all_counts(&[0, 11]),
            Err(PairwiseError::IndexOutOfRange { index: 11, len: 5 })
        );
        assert_eq!(
            universe.update_all_counts(&[2, 0]),
            Err(PairwiseError::MisplacedAtom {
                atom: 2,
                position: 0,
                owner: 1
            })
        );
        assert_eq!(universe.unused_count(), 6);
    }

    #[test]
    fn three_way_bookkeeping_stays_consistent() {
        let mut universe = MoleculeUniverse::build(&scenario(&[2, 2, 2, 2]), 3).unwrap();
        assert_eq!(universe.molecule_count(), 32);
        let vector = [0, 2, 4, 6];
        assert_eq!(universe.update_all_counts(&vector).unwrap(), 4);
        assert_eq!(universe.unused_weights(), recount(&universe).as_slice());
        assert!(!universe.is_unused(&[6, 0, 2]));
        assert!(universe.is_unused(&[1, 2, 4]));
        // 0 and 2 still share [0, 2, 5] and friends.
        assert_eq!(universe.fill_score(2, &[0]), 1);
    }

    #[test]
    fn pairwise_fill_score_probes_both_orders() {
        let universe = MoleculeUniverse::build(&scenario(&[2, 3, 2]), 2).unwrap();
        // Candidate 2 (Param1) against placed 0 (Param0) and 5 (Param2).
        assert_eq!(universe.fill_score(2, &[0, 5]), 2);
    }

    #[test]
    fn arity_one_molecules_are_single_atoms() {
        let mut universe = MoleculeUniverse::build(&scenario(&[3]), 1).unwrap();
        assert_eq!(universe.molecule_count(), 3);
        assert_eq!(universe.fill_score(1, &[]), 1);
        universe.update_all_counts(&[1]).unwrap();
        assert_eq!(universe.fill_score(1, &[]), 0);
        assert_eq!(universe.unused_count(), 2);
    }

    #[test]
    fn unused_iterator_skips_covered_prefix() {
        let mut universe = MoleculeUniverse::build(&scenario(&[2, 3]), 2).unwrap();
        universe.update_all_counts(&[0, 2]).unwrap();
        let first = universe.unused_molecules().next().unwrap();
        assert_eq!(first.1.atoms(), &[0, 3]);
        assert_eq!(universe.unused_molecules().count(), 5);
    }
}
