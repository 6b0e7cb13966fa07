//! Entity and result types shared across the matching pipeline.
//!
//! Entities are read-mostly snapshots owned by the external data layer. The
//! `skills`/`required_skills` and `embedding` fields keep the raw
//! [`serde_json::Value`] shape the data layer hands over; normalization and
//! validation happen in [`crate::skill`] and [`crate::embedding`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[cfg(test)]
mod tests;

/// Identifier assigned by the data layer.
pub type EntityId = i64;

/// Which kind of entity a vector or id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Project,
    Course,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Project => "project",
            EntityKind::Course => "course",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four ordered proficiency tiers, novice to mastery.
///
/// The wire labels are the platform's Chinese tier names; anything else
/// normalizes to [`SkillLevel::Novice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillLevel {
    Novice,
    Developing,
    Proficient,
    Mastery,
}

impl SkillLevel {
    pub const LABELS: [&'static str; 4] = ["初窥门径", "登堂入室", "融会贯通", "炉火纯青"];

    /// Numeric weight used by the proficiency scorer.
    pub fn weight(&self) -> f32 {
        match self {
            SkillLevel::Novice => 1.0,
            SkillLevel::Developing => 2.0,
            SkillLevel::Proficient => 3.0,
            SkillLevel::Mastery => 4.0,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            SkillLevel::Novice => Self::LABELS[0],
            SkillLevel::Developing => Self::LABELS[1],
            SkillLevel::Proficient => Self::LABELS[2],
            SkillLevel::Mastery => Self::LABELS[3],
        }
    }

    /// Exact label lookup. Returns `None` for anything outside the four tiers.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "初窥门径" => Some(SkillLevel::Novice),
            "登堂入室" => Some(SkillLevel::Developing),
            "融会贯通" => Some(SkillLevel::Proficient),
            "炉火纯青" => Some(SkillLevel::Mastery),
            _ => None,
        }
    }

    /// Lenient lookup: unknown or malformed labels collapse to `Novice`.
    pub fn from_label_lenient(label: &str) -> Self {
        Self::from_label(label).unwrap_or(SkillLevel::Novice)
    }
}

impl Serialize for SkillLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_label())
    }
}

impl<'de> Deserialize<'de> for SkillLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(SkillLevel::from_label_lenient(&label))
    }
}

/// A canonical skill: non-empty trimmed name plus a proficiency tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// A person eligible for matching (the platform's student record, trimmed to
/// the fields the matching engine reads).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Raw skill payload as stored; arbitrary shape.
    #[serde(default)]
    pub skills: Value,
    #[serde(default)]
    pub combined_text: Option<String>,
    /// Raw stored embedding; numeric array, JSON-encoded text, or null.
    #[serde(default)]
    pub embedding: Value,
}

/// A project opportunity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw required-skill payload as stored; arbitrary shape.
    #[serde(default)]
    pub required_skills: Value,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_weekly_hours: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub combined_text: Option<String>,
    #[serde(default)]
    pub embedding: Value,
}

/// A course opportunity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub required_skills: Value,
    #[serde(default)]
    pub combined_text: Option<String>,
    #[serde(default)]
    pub embedding: Value,
}

/// Anything carrying a stored embedding the resolver can validate or
/// regenerate.
pub trait Embeddable {
    fn entity_id(&self) -> EntityId;
    fn entity_kind(&self) -> EntityKind;
    /// The raw stored embedding value.
    fn stored_embedding(&self) -> &Value;
    /// The text the embedding is derived from.
    fn embed_text(&self) -> Option<&str>;
}

impl Embeddable for Person {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Person
    }

    fn stored_embedding(&self) -> &Value {
        &self.embedding
    }

    fn embed_text(&self) -> Option<&str> {
        self.combined_text.as_deref()
    }
}

impl Embeddable for Project {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Project
    }

    fn stored_embedding(&self) -> &Value {
        &self.embedding
    }

    fn embed_text(&self) -> Option<&str> {
        self.combined_text.as_deref()
    }
}

impl Embeddable for Course {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Course
    }

    fn stored_embedding(&self) -> &Value {
        &self.embedding
    }

    fn embed_text(&self) -> Option<&str> {
        self.combined_text.as_deref()
    }
}

/// Borrowed view of an opportunity, used by the per-criterion scorers.
#[derive(Debug, Clone, Copy)]
pub enum OpportunityRef<'a> {
    Project(&'a Project),
    Course(&'a Course),
}

impl<'a> OpportunityRef<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            OpportunityRef::Project(_) => EntityKind::Project,
            OpportunityRef::Course(_) => EntityKind::Course,
        }
    }

    pub fn required_skills(&self) -> &'a Value {
        match self {
            OpportunityRef::Project(p) => &p.required_skills,
            OpportunityRef::Course(c) => &c.required_skills,
        }
    }

    /// The string compared against the person's location. Courses use their
    /// category here, mirroring how the platform stores them.
    pub fn location_target(&self) -> Option<&'a str> {
        match self {
            OpportunityRef::Project(p) => p.location.as_deref(),
            OpportunityRef::Course(c) => c.category.as_deref(),
        }
    }
}

/// Per-criterion score record for one candidate.
///
/// `similarity` is cosine similarity; `proficiency`, `time` and `location`
/// are already scaled to their own maxima (5.0, 3.0, 1.0). `combined` is the
/// weighted sum without re-normalization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub similarity: f32,
    pub proficiency: f32,
    pub time: f32,
    pub location: f32,
    pub combined: f32,
}

/// One entry in the ordered result list of a matching run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Identifier of the matched opportunity or person.
    pub id: EntityId,
    /// Human-readable title (opportunities) or name (people).
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Stage-1 weighted scores; `breakdown.combined` is always comparable
    /// within one request.
    pub breakdown: ScoreBreakdown,
    /// Final relevance: the cross-encoder score when reranking succeeded,
    /// otherwise `breakdown.combined`. Not comparable across requests.
    pub relevance: f32,
    #[serde(default)]
    pub rationale: Option<String>,
}
