//! A molecule is one required combination of atoms: the generalisation of a
//! "pair" to any arity. It stores atom indices, never the values themselves.

use crate::scenario::AtomIndex;

/// Position of a molecule in the universe arena.
pub type MoleculeId = usize;

/// Atom tuple plus its coverage flag.
///
/// Equality and hashing look at the atoms only, in order: `[2, 4]` and
/// `[4, 2]` are different molecules.
#[derive(Debug, Clone)]
pub struct Molecule {
    atoms: Box<[AtomIndex]>,
    used: bool,
}

impl Molecule {
    #[must_use]
    pub fn new(atoms: impl Into<Box<[AtomIndex]>>) -> Self {
        Self {
            atoms: atoms.into(),
            used: false,
        }
    }

    #[must_use]
    pub fn atoms(&self) -> &[AtomIndex] {
        &self.atoms
    }

    /// Number of atoms (the arity it was built for).
    #[must_use]
    pub fn atoms_per_molecule(&self) -> usize {
        self.atoms.len()
    }

    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.used
    }

    /// Flip the flag; returns `false` if it was already set.
    pub(crate) fn mark_used(&mut self) -> bool {
        !std::mem::replace(&mut self.used, true)
    }

    #[must_use]
    pub fn contains(&self, atom: AtomIndex) -> bool {
        self.atoms.contains(&atom)
    }
}

impl PartialEq for Molecule {
    fn eq(&self, other: &Self) -> bool {
        self.atoms == other.atoms
    }
}

impl Eq for Molecule {}

impl std::hash::Hash for Molecule {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.atoms.hash(state);
    }
}
