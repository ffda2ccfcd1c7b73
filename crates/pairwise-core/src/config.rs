//! Generator configuration.
//!
//! Values come from (highest priority first) explicit setters, the
//! environment, then defaults:
//! - `PAIRWISE_ARITY`: combination size, default `2`.
//! - `PAIRWISE_POOL_SIZE`: candidates built per iteration, default `1`.
//! - `PAIRWISE_SEED`: RNG seed, decimal or `0x` hex, default `2`.
//!
//! Unparsable environment values fall back to the default for that field.

use serde::{Deserialize, Serialize};

use crate::error::{PairwiseError, Result};

pub const ENV_ARITY: &str = "PAIRWISE_ARITY";
pub const ENV_POOL_SIZE: &str = "PAIRWISE_POOL_SIZE";
pub const ENV_SEED: &str = "PAIRWISE_SEED";

pub const DEFAULT_ARITY: usize = 2;
pub const DEFAULT_POOL_SIZE: usize = 1;
pub const DEFAULT_SEED: u64 = 2;

/// Knobs for one covering-set build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub arity: usize,
    pub pool_size: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            arity: DEFAULT_ARITY,
            pool_size: DEFAULT_POOL_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

impl GeneratorConfig {
    /// Defaults overlaid with the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            arity: lookup(ENV_ARITY)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.arity),
            pool_size: lookup(ENV_POOL_SIZE)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.pool_size),
            seed: lookup(ENV_SEED)
                .and_then(|v| parse_seed(&v))
                .unwrap_or(defaults.seed),
        }
    }

    #[must_use]
    pub const fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject values no build can run with.
    pub fn validate(&self) -> Result<()> {
        if self.arity == 0 {
            return Err(PairwiseError::InvalidConfig {
                field: "arity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.pool_size == 0 {
            return Err(PairwiseError::InvalidConfig {
                field: "pool_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse a seed written as decimal or `0x`-prefixed hex. Underscores are
/// ignored, so `0xDEAD_BEEF` and `1_000` both parse.
#[must_use]
pub fn parse_seed(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != '_').collect();
    if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok()
    } else {
        cleaned.parse().ok()
    }
}
