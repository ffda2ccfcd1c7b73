//! Translation of atom vectors back into named, user-facing rows.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{PairwiseError, Result};
use crate::scenario::{AtomIndex, Scenario};

/// One test case as `(dimension name, value)` cells in dimension order.
///
/// Serialises as a map whose key order is the dimension order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRow<V> {
    cells: Vec<(String, V)>,
}

impl<V> NamedRow<V> {
    #[must_use]
    pub fn from_cells(cells: Vec<(String, V)>) -> Self {
        Self { cells }
    }

    #[must_use]
    pub fn cells(&self) -> &[(String, V)] {
        &self.cells
    }

    /// Value for the dimension called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.cells.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<V: Serialize> Serialize for NamedRow<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Map each atom of every vector to its dimension name and value.
pub fn to_named_rows<V: Clone>(
    scenario: &Scenario<V>,
    vectors: &[Vec<AtomIndex>],
) -> Result<Vec<NamedRow<V>>> {
    vectors
        .iter()
        .map(|vector| named_row(scenario, vector))
        .collect()
}

fn named_row<V: Clone>(scenario: &Scenario<V>, vector: &[AtomIndex]) -> Result<NamedRow<V>> {
    let out_of_range = |atom| PairwiseError::IndexOutOfRange {
        index: atom,
        len: scenario.value_count(),
    };
    let cells = vector
        .iter()
        .map(|&atom| -> Result<(String, V)> {
            let owner = scenario.parameter_owner(atom).ok_or(out_of_range(atom))?;
            let name = scenario
                .parameter_set(owner)
                .map(|set| set.name.clone())
                .ok_or(out_of_range(atom))?;
            let value = scenario.value(atom).cloned().ok_or(out_of_range(atom))?;
            Ok((name, value))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(NamedRow::from_cells(cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browsers() -> Scenario<&'static str> {
        Scenario::from_dimensions([
            ("Browser", vec!["Chrome", "Firefox", "IE"]),
            ("Page", vec!["Home", "Search"]),
        ])
        .unwrap()
    }

    #[test]
    fn atoms_become_names_and_values() {
        let rows = to_named_rows(&browsers(), &[vec![1, 4], vec![2, 3]]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Browser"), Some(&"Firefox"));
        assert_eq!(rows[0].get("Page"), Some(&"Search"));
        assert_eq!(rows[1].get("Browser"), Some(&"IE"));
        assert_eq!(rows[1].get("Missing"), None);
    }

    #[test]
    fn json_keeps_dimension_order() {
        let rows = to_named_rows(&browsers(), &[vec![0, 3]]).unwrap();
        let json = serde_json::to_string(&rows[0]).unwrap();
        assert_eq!(json, r#"{"Browser":"Chrome","Page":"Home"}"#);
    }

    #[test]
    fn unknown_atom_is_an_error() {
        assert_eq!(
            to_named_rows(&browsers(), &[vec![0, 9]]),
            Err(PairwiseError::IndexOutOfRange { index: 9, len: 5 })
        );
    }
}
