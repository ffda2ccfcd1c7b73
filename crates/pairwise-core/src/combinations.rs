//! Dimension-combination enumeration and atom expansion.
//!
//! Enumeration works on parameter-set indices, not atoms. It seeds with every
//! pair of dimensions and grows each combination by one dimension per level
//! until the requested arity is reached:
//!
//! ```text
//! D = 4, K = 3
//! level 2: [0 1] [0 2] [0 3] [1 2] [1 3] [2 3]
//! level 3: [0 1 2] [0 1 3] [0 2 3] [1 2 3]
//! ```
//!
//! Members are always strictly increasing, so a combination is never
//! produced twice.

use std::ops::Range;

use crate::error::{PairwiseError, Result};
use crate::scenario::AtomIndex;

/// All strictly increasing `arity`-subsets of `0..dimensions`, in
/// lexicographic order.
pub fn dimension_combinations(dimensions: usize, arity: usize) -> Result<Vec<Vec<usize>>> {
    if arity == 0 || arity > dimensions {
        return Err(PairwiseError::InvalidArity { arity, dimensions });
    }
    if arity == 1 {
        return Ok((0..dimensions).map(|d| vec![d]).collect());
    }

    let mut level = parameter_pair_combinations(dimensions);
    let pool: Vec<usize> = (0..dimensions).collect();
    while level.first().is_some_and(|set| set.len() < arity) {
        level = extend_level(&level, &pool)?;
    }
    Ok(level)
}

/// Every pair of dimension indices `(i, j)` with `i < j`.
#[must_use]
pub fn parameter_pair_combinations(dimensions: usize) -> Vec<Vec<usize>> {
    let mut pairs = Vec::with_capacity(dimensions * dimensions.saturating_sub(1) / 2);
    for first in 0..dimensions {
        for second in first + 1..dimensions {
            pairs.push(vec![first, second]);
        }
    }
    pairs
}

/// Grow every combination of one level by a single new dimension.
fn extend_level(level: &[Vec<usize>], pool: &[usize]) -> Result<Vec<Vec<usize>>> {
    let mut next = Vec::new();
    for set in level {
        let last = set.last().copied().unwrap_or(0);
        for candidate in purge_from_pool(pool, set)? {
            if candidate > last {
                let mut grown = Vec::with_capacity(set.len() + 1);
                grown.extend_from_slice(set);
                grown.push(candidate);
                next.push(grown);
            }
        }
    }
    Ok(next)
}

/// Remove the members of `set` from the candidate pool.
///
/// A member outside the pool means enumeration bookkeeping is broken; that is
/// reported as [`PairwiseError::IndexOutOfRange`] rather than ignored.
pub fn purge_from_pool(pool: &[usize], set: &[usize]) -> Result<Vec<usize>> {
    for &member in set {
        if !pool.contains(&member) {
            return Err(PairwiseError::IndexOutOfRange {
                index: member,
                len: pool.len(),
            });
        }
    }
    Ok(pool
        .iter()
        .copied()
        .filter(|value| !set.contains(value))
        .collect())
}

/// Cartesian product of the atom groups of one dimension combination.
///
/// The first dimension varies slowest; atoms are listed in the combination's
/// dimension order.
#[must_use]
pub fn expand_atoms(groups: &[Range<AtomIndex>]) -> Vec<Vec<AtomIndex>> {
    let total = groups.iter().map(Range::len).product::<usize>();
    if groups.is_empty() || total == 0 {
        return Vec::new();
    }

    let mut tuples = Vec::with_capacity(total);
    let mut cursor: Vec<AtomIndex> = groups.iter().map(|g| g.start).collect();
    loop {
        tuples.push(cursor.clone());

        // Odometer step from the last dimension.
        let mut slot = groups.len();
        loop {
            if slot == 0 {
                return tuples;
            }
            slot -= 1;
            cursor[slot] += 1;
            if cursor[slot] < groups[slot].end {
                break;
            }
            cursor[slot] = groups[slot].start;
        }
    }
}

/// Number of molecules a dimension combination expands to.
#[must_use]
pub fn combination_size(groups: &[Range<AtomIndex>], combination: &[usize]) -> u64 {
    combination
        .iter()
        .fold(1u64, |acc, &d| acc.saturating_mul(groups[d].len() as u64))
}
