//! Optional hook into the build loop. Observers never affect the result.

use crate::molecule::MoleculeId;
use crate::scenario::AtomIndex;

/// Receives build progress. Every method defaults to a no-op.
pub trait BuildObserver {
    /// A seed molecule was chosen for `iteration`.
    fn on_seed(&mut self, _iteration: usize, _molecule: MoleculeId, _atoms: &[AtomIndex]) {}

    /// Pool member `candidate` was assembled and scored.
    fn on_candidate(
        &mut self,
        _iteration: usize,
        _candidate: usize,
        _vector: &[AtomIndex],
        _captured: usize,
    ) {
    }

    /// A vector was committed.
    fn on_commit(
        &mut self,
        _iteration: usize,
        _vector: &[AtomIndex],
        _newly_covered: usize,
        _unused_remaining: usize,
    ) {
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}
