//! Weighted blending of the per-criterion scores.

use std::cmp::Ordering;

use crate::config::MatchingConfig;
use crate::model::ScoreBreakdown;

/// Blends the four criterion scores into one [`ScoreBreakdown`].
///
/// The inputs keep their own scales (similarity ≈ [0,1], proficiency [0,5],
/// time [0,3], location [0,1]); the weights are applied directly.
pub fn combine_scores(
    similarity: f32,
    proficiency: f32,
    time: f32,
    location: f32,
    config: &MatchingConfig,
) -> ScoreBreakdown {
    let combined = similarity * config.similarity_weight
        + proficiency * config.proficiency_weight
        + time * config.time_weight
        + location * config.location_weight;

    ScoreBreakdown {
        similarity,
        proficiency,
        time,
        location,
        combined,
    }
}

/// Sorts candidates by combined score, highest first. The sort is stable, so
/// ties keep their iteration order.
pub fn rank_descending<T>(candidates: &mut [T], combined_of: impl Fn(&T) -> f32) {
    candidates.sort_by(|a, b| {
        combined_of(b)
            .partial_cmp(&combined_of(a))
            .unwrap_or(Ordering::Equal)
    });
}
