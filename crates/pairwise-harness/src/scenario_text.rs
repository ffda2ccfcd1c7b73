//! Line-oriented scenario format.
//!
//! ```text
//! Browser: Chrome, Firefox, IE
//! Page:    Home, Search
//! ```
//!
//! One parameter set per line, in dimension order. Values are comma
//! separated and trimmed; empty tokens are dropped. Blank lines and lines
//! starting with `#` are skipped.

use pairwise_core::{ParameterSet, Scenario};

use crate::error::ScenarioTextError;

/// Parse a whole scenario document.
pub fn parse_scenario(text: &str) -> Result<Scenario<String>, ScenarioTextError> {
    let mut scenario = Scenario::new();
    for (i, raw) in text.lines().enumerate() {
        let line_number = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parameter_set = parse_line(line, line_number)?;
        scenario
            .add_parameter_set(parameter_set)
            .map_err(|source| ScenarioTextError::Core {
                line: line_number,
                source,
            })?;
    }
    if scenario.parameter_set_count() == 0 {
        return Err(ScenarioTextError::Empty);
    }
    Ok(scenario)
}

fn parse_line(line: &str, line_number: usize) -> Result<ParameterSet<String>, ScenarioTextError> {
    let (name, values) = line
        .split_once(':')
        .ok_or_else(|| ScenarioTextError::MissingSeparator {
            line: line_number,
            text: line.to_string(),
        })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ScenarioTextError::EmptyName { line: line_number });
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    Ok(ParameterSet::new(name, values))
}

/// Render a scenario back into the line format.
#[must_use]
pub fn render_scenario(scenario: &Scenario<String>) -> String {
    let mut out = String::new();
    for set in scenario.parameter_sets() {
        out.push_str(&set.name);
        out.push_str(": ");
        out.push_str(&set.values.join(", "));
        out.push('\n');
    }
    out
}
