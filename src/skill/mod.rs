//! Skill payload normalization.
//!
//! Skill data arrives in whatever shape the client of the day stored:
//! structured records, JSON text, double-encoded JSON text, Python-literal
//! text, or sequences nesting any of the above. Normalization is total:
//! every input maps to a canonical [`Skill`] list or to nothing, and nothing
//! here ever returns an error or panics. Recursion is capped at
//! [`MAX_SKILL_NESTING_DEPTH`]; deeper structures count as unparseable.

mod literal;


use serde_json::Value;

use crate::constants::MAX_SKILL_NESTING_DEPTH;
use crate::model::{Skill, SkillLevel};

/// Coerces a raw top-level skills value into an iterable sequence of raw
/// entries.
///
/// Sequences pass through unchanged (already-normalized input is a fixed
/// point). Text gets up to two quote layers stripped and embedded quotes
/// unescaped, then a structured parse followed by a literal parse; only a
/// sequence result is accepted. Every other shape yields an empty sequence.
pub fn normalize_skill_list(raw: &Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items.clone(),
        Value::String(text) => {
            let unwrapped = strip_quote_layers(text.trim());

            for parsed in parse_attempts(&unwrapped) {
                if let Value::Array(items) = parsed {
                    return items;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Normalizes one raw skill entry of unknown shape into a [`Skill`].
///
/// Records need a non-empty `name`; `level` falls back to the novice tier
/// when absent or outside the four known labels. Text is quote-stripped and
/// parsed like [`normalize_skill_list`]; a parsed record or sequence is
/// normalized recursively, and text that defeats both parsers becomes a
/// novice-level skill named by the trimmed text itself. Sequences yield their
/// first normalizable element. Anything else yields `None`.
pub fn normalize_skill_entry(raw: &Value) -> Option<Skill> {
    normalize_entry_at_depth(raw, 0)
}

fn normalize_entry_at_depth(raw: &Value, depth: usize) -> Option<Skill> {
    if depth > MAX_SKILL_NESTING_DEPTH {
        return None;
    }

    match raw {
        Value::Object(record) => skill_from_record(record),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }

            let unwrapped = strip_quote_layers(trimmed);

            for parsed in parse_attempts(&unwrapped) {
                match parsed {
                    Value::Object(record) => {
                        if record.contains_key("name") {
                            if let Some(skill) = skill_from_record(&record) {
                                return Some(skill);
                            }
                        }
                    }
                    Value::Array(items) if !items.is_empty() => {
                        for item in &items {
                            if let Some(skill) = normalize_entry_at_depth(item, depth + 1) {
                                return Some(skill);
                            }
                        }
                    }
                    _ => {}
                }
            }

            // Neither parser produced anything usable: the text itself is the
            // skill name.
            Some(Skill::new(trimmed, SkillLevel::Novice))
        }
        Value::Array(items) => {
            for item in items {
                if let Some(skill) = normalize_entry_at_depth(item, depth + 1) {
                    if !skill.name.trim().is_empty() {
                        return Some(skill);
                    }
                }
            }
            None
        }
        _ => None,
    }
}

/// Normalizes a full raw skills value into canonical skills, dropping
/// entries that cannot be normalized.
pub fn normalize_skills(raw: &Value) -> Vec<Skill> {
    normalize_skill_list(raw)
        .iter()
        .filter_map(normalize_skill_entry)
        .collect()
}

fn skill_from_record(record: &serde_json::Map<String, Value>) -> Option<Skill> {
    let name = record.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let level = record
        .get("level")
        .and_then(Value::as_str)
        .and_then(SkillLevel::from_label)
        .unwrap_or(SkillLevel::Novice);

    Some(Skill::new(name, level))
}

/// Strips up to two layers of surrounding quote characters, then unescapes
/// embedded quotes. Mixed quote pairs are stripped too, matching how the
/// legacy rows were produced.
fn strip_quote_layers(text: &str) -> String {
    let mut current = text;

    for _ in 0..2 {
        let mut chars = current.chars();
        let (first, last) = (chars.next(), chars.next_back());
        if current.len() > 1
            && matches!(first, Some('\'' | '"'))
            && matches!(last, Some('\'' | '"'))
        {
            current = &current[1..current.len() - 1];
        }
    }

    current.replace("\\\"", "\"").replace("\\'", "'")
}

/// The two text-parsing attempts, in order: strict JSON, then the
/// Python-literal fallback.
fn parse_attempts(text: &str) -> impl Iterator<Item = Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .into_iter()
        .chain(literal::parse(text))
}
