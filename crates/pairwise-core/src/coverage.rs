//! Independent check that a set of vectors covers every molecule.

use serde::Serialize;

use crate::error::{PairwiseError, Result};
use crate::projection::NamedRow;
use crate::scenario::{AtomIndex, Scenario};
use crate::universe::MoleculeUniverse;

/// Outcome of [`verify_coverage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageCheck {
    pub required: usize,
    pub covered: usize,
    /// Atom tuples no vector covers, in arena order.
    pub missing: Vec<Vec<AtomIndex>>,
}

impl CoverageCheck {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Apply `vectors` to a fresh universe and report what is left over.
pub fn verify_coverage<V>(
    scenario: &Scenario<V>,
    arity: usize,
    vectors: &[Vec<AtomIndex>],
) -> Result<CoverageCheck> {
    let mut universe = MoleculeUniverse::build(scenario, arity)?;
    let required = universe.molecule_count();
    for vector in vectors {
        universe.update_all_counts(vector)?;
    }
    let missing: Vec<Vec<AtomIndex>> = universe
        .unused_molecules()
        .map(|(_, m)| m.atoms().to_vec())
        .collect();
    Ok(CoverageCheck {
        required,
        covered: required - missing.len(),
        missing,
    })
}

/// Resolve externally supplied rows back into atom vectors.
pub fn vectors_from_named_rows<V>(
    scenario: &Scenario<V>,
    rows: &[NamedRow<V>],
) -> Result<Vec<Vec<AtomIndex>>>
where
    V: PartialEq + ToString,
{
    rows.iter().map(|row| vector_from_row(scenario, row)).collect()
}

fn vector_from_row<V>(scenario: &Scenario<V>, row: &NamedRow<V>) -> Result<Vec<AtomIndex>>
where
    V: PartialEq + ToString,
{
    scenario
        .parameter_sets()
        .iter()
        .enumerate()
        .map(|(dimension, set)| {
            let value = row.get(&set.name).ok_or_else(|| PairwiseError::MissingDimension {
                dimension: set.name.clone(),
            })?;
            scenario
                .atom_of(dimension, value)
                .ok_or_else(|| PairwiseError::UnknownValue {
                    dimension: set.name.clone(),
                    value: value.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_three() -> Scenario<String> {
        Scenario::from_dimensions([
            ("Param0", vec!["x".to_string(), "y".to_string()]),
            (
                "Param1",
                vec!["i".to_string(), "j".to_string(), "k".to_string()],
            ),
        ])
        .unwrap()
    }

    fn row(pairs: &[(&str, &str)]) -> NamedRow<String> {
        NamedRow::from_cells(
            pairs
                .iter()
                .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn partial_set_reports_missing_tuples() {
        let check = verify_coverage(&two_by_three(), 2, &[vec![0, 2], vec![1, 3]]).unwrap();
        assert_eq!(check.required, 6);
        assert_eq!(check.covered, 2);
        assert_eq!(check.missing, vec![vec![0, 3], vec![0, 4], vec![1, 2], vec![1, 4]]);
        assert!(!check.is_complete());
    }

    #[test]
    fn exhaustive_set_is_complete() {
        let all: Vec<Vec<usize>> = (0..2)
            .flat_map(|a| (2..5).map(move |b| vec![a, b]))
            .collect();
        assert!(verify_coverage(&two_by_three(), 2, &all).unwrap().is_complete());
    }

    #[test]
    fn rows_resolve_by_name_not_position() {
        let s = two_by_three();
        let rows = [row(&[("Param1", "k"), ("Param0", "y")])];
        assert_eq!(vectors_from_named_rows(&s, &rows).unwrap(), vec![vec![1, 4]]);
    }

    #[test]
    fn bad_rows_are_reported() {
        let s = two_by_three();
        assert_eq!(
            vectors_from_named_rows(&s, &[row(&[("Param0", "x")])]),
            Err(PairwiseError::MissingDimension {
                dimension: "Param1".to_string()
            })
        );
        assert_eq!(
            vectors_from_named_rows(&s, &[row(&[("Param0", "z"), ("Param1", "i")])]),
            Err(PairwiseError::UnknownValue {
                dimension: "Param0".to_string(),
                value: "z".to_string()
            })
        );
    }
}
