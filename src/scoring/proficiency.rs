//! Skill proficiency scoring.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::MatchingConfig;
use crate::model::SkillLevel;
use crate::skill::{normalize_skill_entry, normalize_skill_list};

/// Numeric weight of a proficiency tier (novice 1.0 .. mastery 4.0).
pub fn proficiency_level_weight(level: SkillLevel) -> f32 {
    level.weight()
}

/// Scores how well a person's skills cover an opportunity's requirements.
///
/// Returns a value in `[0, skill_scale]`. Both inputs are raw payloads and go
/// through [`crate::skill`] normalization first. Per required skill: full
/// requirement weight when the person is at or above the required tier,
/// floored partial credit when below, and a deduction of
/// `missing_skill_penalty * weight` when the skill is absent. The raw sum may
/// go negative; it is normalized by the total possible weight and clamped at
/// zero. No requirements at all count as a perfect match.
pub fn score_proficiency(
    person_skills: &Value,
    required_skills: &Value,
    config: &MatchingConfig,
) -> f32 {
    let mut raw_score = 0.0f32;

    let person_entries = normalize_skill_list(person_skills);
    let required_entries = normalize_skill_list(required_skills);

    let mut person_map: HashMap<String, f32> = HashMap::new();
    for entry in &person_entries {
        if let Some(skill) = normalize_skill_entry(entry) {
            person_map.insert(skill.name, skill.level.weight());
        }
    }

    let mut total_possible = 0.0f32;

    for entry in &required_entries {
        let Some(required) = normalize_skill_entry(entry) else {
            continue;
        };

        let required_weight = required.level.weight();
        total_possible += required_weight;

        match person_map.get(&required.name) {
            Some(&person_weight) => {
                let level_difference = required_weight - person_weight;
                if level_difference <= 0.0 {
                    raw_score += required_weight;
                } else {
                    let penalty = level_difference * config.level_diff_penalty;
                    raw_score += (person_weight - penalty).max(config.min_level_match_score);
                }
            }
            None => {
                raw_score -= required_weight * config.missing_skill_penalty;
            }
        }
    }

    let normalized = if total_possible > 0.0 {
        (raw_score / total_possible).max(0.0)
    } else {
        1.0
    };

    normalized * config.skill_scale
}
