//! Covering-set reports.
//!
//! The row digest is the SHA-256 of the compact JSON encoding of `rows`, so
//! two reports with the same digest list the same test cases in the same
//! order regardless of seed or pool size.

use serde::Serialize;
use sha2::{Digest, Sha256};

use pairwise_core::{CoveringSet, NamedRow, PairwiseError, Scenario};

pub const REPORT_SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize)]
pub struct CoveringReport {
    pub schema_version: &'static str,
    pub dimensions: Vec<String>,
    pub arity: usize,
    pub pool_size: usize,
    pub seed: u64,
    pub molecule_count: usize,
    pub full_combination_count: u64,
    pub vector_count: usize,
    /// Rows saved against the exhaustive cross product, in percent.
    pub reduction_percent: f64,
    pub rows_sha256: String,
    pub rows: Vec<NamedRow<String>>,
}

impl CoveringReport {
    pub fn new(
        scenario: &Scenario<String>,
        set: &CoveringSet,
        molecule_count: usize,
    ) -> Result<Self, PairwiseError> {
        let rows = set.to_named_rows(scenario)?;
        let full = scenario.full_combination_count();
        let reduction_percent = if full == 0 {
            0.0
        } else {
            100.0 * (1.0 - set.len() as f64 / full as f64)
        };
        Ok(Self {
            schema_version: REPORT_SCHEMA_VERSION,
            dimensions: scenario
                .parameter_sets()
                .iter()
                .map(|s| s.name.clone())
                .collect(),
            arity: set.arity,
            pool_size: set.pool_size,
            seed: set.seed,
            molecule_count,
            full_combination_count: full,
            vector_count: set.len(),
            reduction_percent,
            rows_sha256: rows_digest(&rows),
            rows,
        })
    }

    /// Pretty JSON document.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Tab-separated table: a header of dimension names, then one row per
    /// vector.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        let mut out = self.dimensions.join("\t");
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(|(_, v)| v.as_str()).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}-wise covering set\n\n", self.arity));
        out.push_str(&format!(
            "- Vectors: {} of {} ({:.1}% reduction)\n",
            self.vector_count, self.full_combination_count, self.reduction_percent
        ));
        out.push_str(&format!("- Molecules: {}\n", self.molecule_count));
        out.push_str(&format!(
            "- Seed: {}, pool size: {}\n",
            self.seed, self.pool_size
        ));
        out.push_str(&format!("- Rows SHA-256: `{}`\n\n", self.rows_sha256));

        out.push_str("| # |");
        for name in &self.dimensions {
            out.push_str(&format!(" {name} |"));
        }
        out.push_str("\n|---|");
        for _ in &self.dimensions {
            out.push_str("---|");
        }
        out.push('\n');
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&format!("| {} |", i + 1));
            for (_, value) in row.iter() {
                out.push_str(&format!(" {value} |"));
            }
            out.push('\n');
        }
        out
    }
}

/// Lowercase hex SHA-256 of the compact JSON rows.
#[must_use]
pub fn rows_digest(rows: &[NamedRow<String>]) -> String {
    let encoded = serde_json::to_vec(rows).unwrap_or_default();
    hex_lower(&Sha256::digest(&encoded))
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
