//! Cross-cutting, shared constants.
//!
//! Prefer deriving runtime settings from [`MatchingConfig`](crate::config::MatchingConfig);
//! the constants here are its defaults and the fixed vocabulary of the scoring rules.

/// Embedding vector dimension expected from the data layer and the provider.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Size of the first-stage candidate shortlist.
pub const DEFAULT_INITIAL_K: usize = 50;

/// Number of results returned to the caller.
pub const DEFAULT_FINAL_K: usize = 3;

/// Weight of semantic similarity in the combined score.
pub const DEFAULT_SIMILARITY_WEIGHT: f32 = 0.5;
/// Weight of the proficiency score in the combined score.
pub const DEFAULT_PROFICIENCY_WEIGHT: f32 = 0.3;
/// Weight of the time-affinity score in the combined score.
pub const DEFAULT_TIME_WEIGHT: f32 = 0.1;
/// Weight of the location-affinity score in the combined score.
pub const DEFAULT_LOCATION_WEIGHT: f32 = 0.1;

/// Upper bound of the proficiency score (`W_SKILL`).
pub const SKILL_MATCH_OVERALL_WEIGHT: f32 = 5.0;
/// Upper bound of the time-affinity score (`W_TIME`).
pub const OVERALL_TIME_MATCH_WEIGHT: f32 = 3.0;

/// Penalty per level of shortfall on a matched-but-underqualified skill.
pub const MAX_SKILL_LEVEL_DIFF_PENALTY: f32 = 0.5;
/// Floor for the partial credit granted to an underqualified match.
pub const MIN_LEVEL_MATCH_SCORE: f32 = 1.0;
/// Fraction of the requirement weight subtracted for a missing skill.
pub const MISSING_SKILL_PENALTY: f32 = 0.75;

/// Bound of the worker pool used for candidate embedding regeneration.
pub const DEFAULT_REGEN_CONCURRENCY: usize = 8;

/// Maximum nesting depth honored when normalizing skill payloads.
/// Deeper structures are treated as unparseable rather than recursed into.
pub const MAX_SKILL_NESTING_DEPTH: usize = 4;
