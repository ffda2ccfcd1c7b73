//! Shared scenario shapes for the benchmarks.

use pairwise_core::{Result, Scenario};

/// Seven dimensions of mixed width.
pub const MIXED_SIZES: &[usize] = &[2, 4, 3, 5, 2, 3, 7];

/// Scenario with `sizes[d]` integer values in dimension `d`.
///
/// A zero width fails with `InvalidParameterSet`.
pub fn sized_scenario(sizes: &[usize]) -> Result<Scenario<usize>> {
    Scenario::from_dimensions(
        sizes
            .iter()
            .enumerate()
            .map(|(d, &n)| (format!("Param{d}"), (0..n).collect::<Vec<_>>())),
    )
}

/// `dimensions` dimensions of `width` values each.
pub fn uniform_scenario(dimensions: usize, width: usize) -> Result<Scenario<usize>> {
    sized_scenario(&vec![width; dimensions])
}
