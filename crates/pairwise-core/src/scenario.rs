//! Scenario model: named parameter sets and the flattened value space.
//!
//! Consider:
//!
//! ```text
//! Param1: a, b, c
//! Param2: i, j, k, l
//! Param3: x, y
//! ```
//!
//! The derived tables are:
//!
//! ```text
//! flattened_values:   [a, b, c, i, j, k, l, x, y]
//! legal_value_groups: [0..3, 3..7, 7..9]
//! parameter_owner:    [0, 0, 0, 1, 1, 1, 1, 2, 2]
//! ```
//!
//! A test vector such as `[2, 4, 7]` picks one atom per parameter set.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{PairwiseError, Result};

/// Position of a value in the flattened value space.
pub type AtomIndex = usize;

/// One input dimension: a name plus its ordered legal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet<V> {
    pub name: String,
    pub values: Vec<V>,
}

impl<V> ParameterSet<V> {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<&V> {
        self.values.get(index)
    }
}

/// Ordered, append-only collection of parameter sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario<V> {
    parameter_sets: Vec<ParameterSet<V>>,
    flattened_values: Vec<V>,
    legal_value_groups: Vec<Range<AtomIndex>>,
    parameter_owner: Vec<usize>,
}

impl<V> Default for Scenario<V> {
    fn default() -> Self {
        Self {
            parameter_sets: Vec::new(),
            flattened_values: Vec::new(),
            legal_value_groups: Vec::new(),
            parameter_owner: Vec::new(),
        }
    }
}

impl<V: Clone> Scenario<V> {
    /// Empty scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scenario from `(name, values)` pairs in dimension order.
    pub fn from_dimensions<N, I>(dimensions: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<V>)>,
    {
        let mut scenario = Self::new();
        for (name, values) in dimensions {
            scenario.add_parameter_set(ParameterSet::new(name, values))?;
        }
        Ok(scenario)
    }

    /// Append a parameter set and extend every derived table in one step.
    ///
    /// Fails with [`PairwiseError::InvalidParameterSet`] for an empty value
    /// list; the scenario is left untouched in that case.
    pub fn add_parameter_set(&mut self, parameter_set: ParameterSet<V>) -> Result<()> {
        if parameter_set.is_empty() {
            return Err(PairwiseError::InvalidParameterSet {
                name: parameter_set.name,
            });
        }

        let dimension = self.parameter_sets.len();
        let start = self.flattened_values.len();
        let end = start + parameter_set.len();

        self.flattened_values
            .extend(parameter_set.values.iter().cloned());
        self.legal_value_groups.push(start..end);
        self.parameter_owner
            .extend(std::iter::repeat_n(dimension, parameter_set.len()));
        self.parameter_sets.push(parameter_set);

        debug_assert_eq!(self.flattened_values.len(), self.parameter_owner.len());
        Ok(())
    }
}

impl<V> Scenario<V> {
    #[must_use]
    pub fn parameter_sets(&self) -> &[ParameterSet<V>] {
        &self.parameter_sets
    }

    #[must_use]
    pub fn parameter_set(&self, dimension: usize) -> Option<&ParameterSet<V>> {
        self.parameter_sets.get(dimension)
    }

    /// Number of dimensions.
    #[must_use]
    pub fn parameter_set_count(&self) -> usize {
        self.parameter_sets.len()
    }

    /// Number of atoms across all dimensions.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.flattened_values.len()
    }

    #[must_use]
    pub fn flattened_values(&self) -> &[V] {
        &self.flattened_values
    }

    #[must_use]
    pub fn legal_value_groups(&self) -> &[Range<AtomIndex>] {
        &self.legal_value_groups
    }

    /// Atom range owned by `dimension`.
    #[must_use]
    pub fn legal_values(&self, dimension: usize) -> Option<Range<AtomIndex>> {
        self.legal_value_groups.get(dimension).cloned()
    }

    #[must_use]
    pub fn parameter_owners(&self) -> &[usize] {
        &self.parameter_owner
    }

    /// Dimension that owns `atom`.
    #[must_use]
    pub fn parameter_owner(&self, atom: AtomIndex) -> Option<usize> {
        self.parameter_owner.get(atom).copied()
    }

    #[must_use]
    pub fn value(&self, atom: AtomIndex) -> Option<&V> {
        self.flattened_values.get(atom)
    }

    /// Value count per dimension, in dimension order.
    #[must_use]
    pub fn dimension_sizes(&self) -> Vec<usize> {
        self.legal_value_groups.iter().map(Range::len).collect()
    }

    /// Size of the exhaustive cross product.
    ///
    /// Saturates at `u64::MAX` for very large scenarios.
    #[must_use]
    pub fn full_combination_count(&self) -> u64 {
        self.legal_value_groups
            .iter()
            .fold(1u64, |acc, group| acc.saturating_mul(group.len() as u64))
    }
}

impl<V: PartialEq> Scenario<V> {
    /// Reverse lookup of a value within one dimension.
    #[must_use]
    pub fn atom_of(&self, dimension: usize, value: &V) -> Option<AtomIndex> {
        let group = self.legal_value_groups.get(dimension)?;
        group
            .clone()
            .find(|&atom| self.flattened_values[atom] == *value)
    }
}
