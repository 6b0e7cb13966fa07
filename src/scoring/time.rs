//! Time and commitment affinity scoring.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MatchingConfig;
use crate::model::{OpportunityRef, Person, Project};

// Availability strings mix Chinese and ASCII freely ("每周15-20小时",
// "30+小时", "全职"). Input is lowercased with spaces removed before these run.
static RE_HOUR_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)-(\d+)(?:小时)?").unwrap());
static RE_HOURS_GT: Lazy<Regex> = Lazy::new(|| Regex::new(r">(\d+)(?:小时)?").unwrap());
static RE_HOURS_PLUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\+(?:小时)?").unwrap());
static RE_HOURS_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)(?:小时)?").unwrap());

/// Extracts a weekly-hours estimate from a free-text availability string.
///
/// Recognized, in order: a numeric range (midpoint, integer floor), a
/// `>N`/`N+` lower bound (N + 5), a bare number, and the full-time keywords
/// (40). Returns `None` when nothing matches.
pub fn parse_weekly_hours(availability: &str) -> Option<u32> {
    if availability.trim().is_empty() {
        return None;
    }

    let normalized = availability.to_lowercase().replace(' ', "");

    if let Some(caps) = RE_HOUR_RANGE.captures(&normalized) {
        let low: u32 = caps[1].parse().ok()?;
        let high: u32 = caps[2].parse().ok()?;
        return Some((low + high) / 2);
    }

    if let Some(caps) = RE_HOURS_GT.captures(&normalized) {
        let n: u32 = caps[1].parse().ok()?;
        return Some(n + 5);
    }

    if let Some(caps) = RE_HOURS_PLUS.captures(&normalized) {
        let n: u32 = caps[1].parse().ok()?;
        return Some(n + 5);
    }

    if let Some(caps) = RE_HOURS_BARE.captures(&normalized) {
        return caps[1].parse().ok();
    }

    if normalized.contains("全职") || normalized.contains("full-time") {
        return Some(40);
    }

    None
}

/// Temporal hints extracted from an availability string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKeyword {
    Summer,
    Winter,
    Semester,
    LongTerm,
    ShortTerm,
}

impl TemporalKeyword {
    /// Scans an availability string for period keywords.
    pub fn extract(availability: &str) -> Vec<TemporalKeyword> {
        let lower = availability.to_lowercase();
        let mut found = Vec::new();

        if lower.contains("暑假") || lower.contains("夏季") {
            found.push(TemporalKeyword::Summer);
        }
        if lower.contains("寒假") || lower.contains("冬季") {
            found.push(TemporalKeyword::Winter);
        }
        if lower.contains("学期内") {
            found.push(TemporalKeyword::Semester);
        }
        if lower.contains("长期") || lower.contains("long-term") {
            found.push(TemporalKeyword::LongTerm);
        }
        if lower.contains("短期") || lower.contains("short-term") {
            found.push(TemporalKeyword::ShortTerm);
        }

        found
    }
}

/// Scores time/commitment compatibility between a person and an opportunity.
///
/// Projects blend a weekly-hours fit (weight 0.6) with a date/period fit
/// (weight 0.4); courses get a flat 0.9. The result is scaled by
/// `config.time_scale`.
pub fn score_time(person: &Person, opportunity: OpportunityRef<'_>, config: &MatchingConfig) -> f32 {
    let time_score = match opportunity {
        OpportunityRef::Project(project) => {
            let hours_score = project_hours_score(person, project);
            let dates_score = project_dates_score(person, project);
            hours_score * 0.6 + dates_score * 0.4
        }
        OpportunityRef::Course(_) => 0.9,
    };

    time_score * config.time_scale
}

fn project_hours_score(person: &Person, project: &Project) -> f32 {
    let person_hours = person.availability.as_deref().and_then(parse_weekly_hours);

    match project.estimated_weekly_hours {
        Some(required) if required > 0 => match person_hours {
            Some(available) => {
                if available >= required {
                    1.0
                } else {
                    (available as f32 / required as f32).max(0.2)
                }
            }
            None => 0.3,
        },
        _ => {
            if person_hours.is_some() {
                0.8
            } else {
                0.5
            }
        }
    }
}

fn project_dates_score(person: &Person, project: &Project) -> f32 {
    let keywords = person
        .availability
        .as_deref()
        .map(TemporalKeyword::extract)
        .unwrap_or_default();

    let dates = match (project.start_date, project.end_date) {
        (Some(start), Some(end)) if end > start => Some((start, end)),
        _ => None,
    };

    let Some((start, end)) = dates else {
        return if keywords.is_empty() { 0.5 } else { 0.7 };
    };

    let start_month = chrono::Datelike::month(&start);
    let duration_months = end.signed_duration_since(start).num_days() as f32 / 30.0;

    let is_summer_start = (6..=8).contains(&start_month);
    let is_winter_start = start_month == 1 || start_month == 12;

    let mut matched_period = false;

    if keywords.contains(&TemporalKeyword::Summer) && is_summer_start {
        matched_period = true;
    } else if keywords.contains(&TemporalKeyword::Winter) && is_winter_start {
        matched_period = true;
    } else if keywords.contains(&TemporalKeyword::Semester) && !is_summer_start && !is_winter_start
    {
        matched_period = true;
    }

    if keywords.contains(&TemporalKeyword::LongTerm) && duration_months >= 6.0 {
        matched_period = true;
    } else if keywords.contains(&TemporalKeyword::ShortTerm) && duration_months < 3.0 {
        matched_period = true;
    }

    if matched_period {
        1.0
    } else if !keywords.is_empty() {
        0.5
    } else {
        0.2
    }
}
