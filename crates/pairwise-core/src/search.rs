//! Lookup from atom tuples to unused molecules.
//!
//! An entry is present exactly while its molecule is unused. Lookups accept
//! the atoms in any order.

use std::collections::HashMap;

use crate::molecule::MoleculeId;
use crate::scenario::AtomIndex;

/// Search structure over the unused molecules of one universe.
#[derive(Debug, Clone)]
pub enum CoverageIndex {
    /// Pairwise: `value_count x value_count` matrix. Only `[a][b]` with
    /// `a < b` is ever written; a cell holds `id + 1`, zero when covered.
    Dense { width: usize, cells: Vec<usize> },
    /// Any other arity: keyed by the sorted atom tuple.
    Hashed(HashMap<Box<[AtomIndex]>, MoleculeId>),
}

impl CoverageIndex {
    #[must_use]
    pub fn for_arity(arity: usize, value_count: usize, molecules: usize) -> Self {
        if arity == 2 {
            Self::Dense {
                width: value_count,
                cells: vec![0; value_count * value_count],
            }
        } else {
            Self::Hashed(HashMap::with_capacity(molecules))
        }
    }

    /// Register an unused molecule.
    pub fn insert(&mut self, atoms: &[AtomIndex], id: MoleculeId) {
        match self {
            Self::Dense { width, cells } => {
                let (a, b) = (atoms[0], atoms[1]);
                cells[a * *width + b] = id + 1;
            }
            Self::Hashed(map) => {
                map.insert(sorted_key(atoms), id);
            }
        }
    }

    /// Unused molecule with exactly these atoms, in any order.
    #[must_use]
    pub fn lookup(&self, atoms: &[AtomIndex]) -> Option<MoleculeId> {
        match self {
            Self::Dense { width, cells } => {
                let (a, b) = (*atoms.first()?, *atoms.get(1)?);
                if atoms.len() != 2 || a >= *width || b >= *width {
                    return None;
                }
                let forward = cells[a * *width + b];
                let cell = if forward != 0 {
                    forward
                } else {
                    cells[b * *width + a]
                };
                (cell != 0).then(|| cell - 1)
            }
            Self::Hashed(map) => {
                let key = sorted_key(atoms);
                map.get(&key[..]).copied()
            }
        }
    }

    /// Drop the entry for a covered molecule.
    pub fn remove(&mut self, atoms: &[AtomIndex]) -> Option<MoleculeId> {
        match self {
            Self::Dense { width, cells } => {
                let (a, b) = (*atoms.first()?, *atoms.get(1)?);
                if a >= *width || b >= *width {
                    return None;
                }
                for slot in [a * *width + b, b * *width + a] {
                    let cell = std::mem::take(&mut cells[slot]);
                    if cell != 0 {
                        return Some(cell - 1);
                    }
                }
                None
            }
            Self::Hashed(map) => {
                let key = sorted_key(atoms);
                map.remove(&key[..])
            }
        }
    }

    #[must_use]
    pub fn contains(&self, atoms: &[AtomIndex]) -> bool {
        self.lookup(atoms).is_some()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Dense { cells, .. } => cells.iter().filter(|&&c| c != 0).count(),
            Self::Hashed(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sorted_key(atoms: &[AtomIndex]) -> Box<[AtomIndex]> {
    let mut key: Box<[AtomIndex]> = atoms.into();
    key.sort_unstable();
    key
}
