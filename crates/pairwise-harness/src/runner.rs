//! Command implementations shared by the binary and the integration tests.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use pairwise_core::{
    CoverageCheck, CoveringSetBuilder, GeneratorConfig, MoleculeUniverse, NamedRow,
    PairwiseError, Scenario, vectors_from_named_rows, verify_coverage,
};

use crate::error::HarnessError;
use crate::report::CoveringReport;
use crate::structured_log::{JsonlObserver, LogEmitter, LogLevel, Outcome};

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, HarnessError> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Build and cover the universe, logging progress when an emitter is given.
pub fn generate_report(
    scenario: &Scenario<String>,
    config: &GeneratorConfig,
    log: Option<&mut LogEmitter>,
) -> Result<CoveringReport, HarnessError> {
    let started = Instant::now();
    let mut builder = CoveringSetBuilder::new(config)?;
    let mut universe = MoleculeUniverse::build(scenario, config.arity)?;
    let molecule_count = universe.molecule_count();

    let set = match log {
        None => builder.run(&mut universe, scenario)?,
        Some(emitter) => {
            let start = emitter
                .entry(LogLevel::Info, "build_start")
                .with_arity(config.arity)
                .with_details(serde_json::json!({
                    "dimensions": scenario.parameter_set_count(),
                    "values": scenario.value_count(),
                    "molecules": molecule_count,
                    "pool_size": config.pool_size,
                    "seed": config.seed,
                }));
            emitter.emit_entry(start)?;

            let mut observer = JsonlObserver::new(emitter, config.arity);
            let result = builder.run_observed(&mut universe, scenario, &mut observer);
            observer.finish()?;

            let elapsed = elapsed_ms(started);
            match result {
                Ok(set) => {
                    let done = emitter
                        .entry(LogLevel::Info, "build_complete")
                        .with_arity(config.arity)
                        .with_outcome(Outcome::Pass)
                        .with_duration_ms(elapsed)
                        .with_details(serde_json::json!({ "vectors": set.len() }));
                    emitter.emit_entry(done)?;
                    emitter.flush()?;
                    set
                }
                Err(err) => {
                    let outcome = if matches!(err, PairwiseError::Cancelled { .. }) {
                        Outcome::Cancelled
                    } else {
                        Outcome::Error
                    };
                    let failed = emitter
                        .entry(LogLevel::Error, "build_failed")
                        .with_arity(config.arity)
                        .with_outcome(outcome)
                        .with_duration_ms(elapsed)
                        .with_details(serde_json::json!({ "error": err.to_string() }));
                    emitter.emit_entry(failed)?;
                    emitter.flush()?;
                    return Err(err.into());
                }
            }
        }
    };

    Ok(CoveringReport::new(scenario, &set, molecule_count)?)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Size of a scenario's search space at one arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountSummary {
    pub dimensions: usize,
    pub values: usize,
    pub arity: usize,
    pub dimension_combinations: usize,
    pub molecule_count: u64,
    pub full_combination_count: u64,
}

pub fn count_summary<V>(scenario: &Scenario<V>, arity: usize) -> Result<CountSummary, HarnessError> {
    let combinations =
        pairwise_core::combinations::dimension_combinations(scenario.parameter_set_count(), arity)?;
    Ok(CountSummary {
        dimensions: scenario.parameter_set_count(),
        values: scenario.value_count(),
        arity,
        dimension_combinations: combinations.len(),
        molecule_count: MoleculeUniverse::count_molecules(scenario, arity)?,
        full_combination_count: scenario.full_combination_count(),
    })
}

/// Check externally supplied rows for full coverage.
///
/// `rows_json` is either an array of `{name: value}` objects or a report
/// document with a `rows` array. Non-string values are compared by their
/// JSON text.
pub fn verify_rows(
    scenario: &Scenario<String>,
    arity: usize,
    rows_json: &str,
) -> Result<CoverageCheck, HarnessError> {
    let document: serde_json::Value = serde_json::from_str(rows_json)?;
    let array = match &document {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(obj) => obj
            .get("rows")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| HarnessError::Rows("object has no 'rows' array".to_string()))?,
        _ => return Err(HarnessError::Rows("expected an array of objects".to_string())),
    };

    let rows = array
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<NamedRow<String>, HarnessError> {
            let obj = item
                .as_object()
                .ok_or_else(|| HarnessError::Rows(format!("row {i} is not an object")))?;
            let cells = obj
                .iter()
                .map(|(name, value)| {
                    let text = match value {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (name.clone(), text)
                })
                .collect();
            Ok(NamedRow::from_cells(cells))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vectors = vectors_from_named_rows(scenario, &rows)?;
    Ok(verify_coverage(scenario, arity, &vectors)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_text::parse_scenario;
    use crate::structured_log::validate_log_text;

    fn browsers() -> Scenario<String> {
        parse_scenario("Browser: Chrome, Firefox, IE\nPage: Home, Search\nLocale: en, de\n").unwrap()
    }

    #[test]
    fn logged_and_unlogged_runs_agree() {
        let config = GeneratorConfig::default().with_pool_size(2);
        let plain = generate_report(&browsers(), &config, None).unwrap();
        let (mut emitter, buffer) = LogEmitter::to_buffer("pairwise", "test");
        let logged = generate_report(&browsers(), &config, Some(&mut emitter)).unwrap();
        assert_eq!(plain.rows_sha256, logged.rows_sha256);

        let text = buffer.contents();
        let (lines, errors) = validate_log_text(&text);
        assert!(errors.is_empty(), "{errors:?}");
        let commits = text.matches("\"vector_committed\"").count();
        assert_eq!(commits, logged.vector_count);
        // start + complete + a seed and two candidates per commit.
        assert_eq!(lines, 2 + commits * 4);
        assert!(text.lines().last().unwrap().contains("build_complete"));
    }

    #[test]
    fn count_reports_molecules_without_building() {
        let summary = count_summary(&browsers(), 2).unwrap();
        assert_eq!(summary.dimensions, 3);
        assert_eq!(summary.values, 7);
        assert_eq!(summary.dimension_combinations, 3);
        assert_eq!(summary.molecule_count, 6 + 6 + 4);
        assert_eq!(summary.full_combination_count, 12);
        assert!(count_summary(&browsers(), 4).is_err());
    }

    #[test]
    fn verify_accepts_generated_report() {
        let report = generate_report(&browsers(), &GeneratorConfig::default(), None).unwrap();
        let check = verify_rows(&browsers(), 2, &report.to_json()).unwrap();
        assert!(check.is_complete());
        assert_eq!(check.required, 16);
    }

    #[test]
    fn verify_flags_missing_pairs() {
        let rows = r#"[{"Browser":"Chrome","Page":"Home","Locale":"en"}]"#;
        let check = verify_rows(&browsers(), 2, rows).unwrap();
        assert_eq!(check.covered, 3);
        assert_eq!(check.missing.len(), 13);
    }

    #[test]
    fn verify_rejects_malformed_rows() {
        assert!(matches!(
            verify_rows(&browsers(), 2, "42"),
            Err(HarnessError::Rows(_))
        ));
        assert!(matches!(
            verify_rows(&browsers(), 2, r#"[{"Browser":"Opera","Page":"Home","Locale":"en"}]"#),
            Err(HarnessError::Core(PairwiseError::UnknownValue { .. }))
        ));
    }
}
