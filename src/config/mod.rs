//! Matching configuration.
//!
//! All scoring constants and shortlist sizes live in one [`MatchingConfig`] so
//! callers can override them per request. Defaults come from
//! [`crate::constants`]; `CAMPUS_MATCH_*` environment variables override the
//! structural knobs (dimensions and K values), not the scoring weights.

pub mod error;


pub use error::ConfigError;

use std::env;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_FINAL_K, DEFAULT_INITIAL_K, DEFAULT_LOCATION_WEIGHT,
    DEFAULT_PROFICIENCY_WEIGHT, DEFAULT_REGEN_CONCURRENCY, DEFAULT_SIMILARITY_WEIGHT,
    DEFAULT_TIME_WEIGHT, MAX_SKILL_LEVEL_DIFF_PENALTY, MIN_LEVEL_MATCH_SCORE,
    MISSING_SKILL_PENALTY, OVERALL_TIME_MATCH_WEIGHT, SKILL_MATCH_OVERALL_WEIGHT,
};

/// Tunable parameters of one matching run.
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Expected embedding vector dimension. Default: `1024`.
    pub embedding_dim: usize,

    /// First-stage shortlist size. Default: `50`.
    pub initial_k: usize,

    /// Number of results handed back to the caller. Default: `3`.
    pub final_k: usize,

    /// Combined-score weight of semantic similarity. Default: `0.5`.
    pub similarity_weight: f32,

    /// Combined-score weight of the proficiency score. Default: `0.3`.
    pub proficiency_weight: f32,

    /// Combined-score weight of the time-affinity score. Default: `0.1`.
    pub time_weight: f32,

    /// Combined-score weight of the location-affinity score. Default: `0.1`.
    pub location_weight: f32,

    /// Upper bound of the proficiency score. Default: `5.0`.
    pub skill_scale: f32,

    /// Upper bound of the time-affinity score. Default: `3.0`.
    pub time_scale: f32,

    /// Penalty per level of shortfall on an underqualified skill. Default: `0.5`.
    pub level_diff_penalty: f32,

    /// Floor of the partial credit for an underqualified match. Default: `1.0`.
    pub min_level_match_score: f32,

    /// Fraction of the requirement weight deducted for a missing skill. Default: `0.75`.
    pub missing_skill_penalty: f32,

    /// Worker-pool bound for candidate embedding regeneration. Default: `8`.
    pub regen_concurrency: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            initial_k: DEFAULT_INITIAL_K,
            final_k: DEFAULT_FINAL_K,
            similarity_weight: DEFAULT_SIMILARITY_WEIGHT,
            proficiency_weight: DEFAULT_PROFICIENCY_WEIGHT,
            time_weight: DEFAULT_TIME_WEIGHT,
            location_weight: DEFAULT_LOCATION_WEIGHT,
            skill_scale: SKILL_MATCH_OVERALL_WEIGHT,
            time_scale: OVERALL_TIME_MATCH_WEIGHT,
            level_diff_penalty: MAX_SKILL_LEVEL_DIFF_PENALTY,
            min_level_match_score: MIN_LEVEL_MATCH_SCORE,
            missing_skill_penalty: MISSING_SKILL_PENALTY,
            regen_concurrency: DEFAULT_REGEN_CONCURRENCY,
        }
    }
}

impl MatchingConfig {
    const ENV_EMBEDDING_DIM: &'static str = "CAMPUS_MATCH_EMBEDDING_DIM";
    const ENV_INITIAL_K: &'static str = "CAMPUS_MATCH_INITIAL_K";
    const ENV_FINAL_K: &'static str = "CAMPUS_MATCH_FINAL_K";
    const ENV_REGEN_CONCURRENCY: &'static str = "CAMPUS_MATCH_REGEN_CONCURRENCY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            embedding_dim: Self::parse_usize_from_env(
                Self::ENV_EMBEDDING_DIM,
                defaults.embedding_dim,
            )?,
            initial_k: Self::parse_usize_from_env(Self::ENV_INITIAL_K, defaults.initial_k)?,
            final_k: Self::parse_usize_from_env(Self::ENV_FINAL_K, defaults.final_k)?,
            regen_concurrency: Self::parse_usize_from_env(
                Self::ENV_REGEN_CONCURRENCY,
                defaults.regen_concurrency,
            )?,
            ..defaults
        })
    }

    /// Overrides both shortlist sizes, keeping everything else.
    pub fn with_k(mut self, initial_k: usize, final_k: usize) -> Self {
        self.initial_k = initial_k;
        self.final_k = final_k;
        self
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroEmbeddingDim);
        }
        if self.initial_k == 0 {
            return Err(ConfigError::ZeroInitialK);
        }
        if self.final_k == 0 {
            return Err(ConfigError::ZeroFinalK);
        }
        if self.final_k > self.initial_k {
            return Err(ConfigError::FinalKExceedsInitialK {
                final_k: self.final_k,
                initial_k: self.initial_k,
            });
        }
        if self.regen_concurrency == 0 {
            return Err(ConfigError::ZeroRegenConcurrency);
        }
        Ok(())
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidEnvValue {
                var: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }
}
