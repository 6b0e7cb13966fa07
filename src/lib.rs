//! Campus-match library crate (used by the platform services and integration
//! tests).
//!
//! Pairs people with opportunities (person→projects, person→courses,
//! project→people) by combining embedding similarity with rule-based
//! scoring, optional cross-encoder reranking, and generated match rationales.
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`MatchingConfig`], [`ConfigError`] - Pipeline configuration
//! - [`Person`], [`Project`], [`Course`] - Entity snapshots from the data layer
//! - [`MatchResult`], [`ScoreBreakdown`] - Ranked output
//!
//! ## Pipeline
//! - [`MatchOrchestrator`], [`MatchError`] - The three matching entry points
//! - [`EmbeddingResolver`] - Stored-vector validation and lazy regeneration
//! - [`Reranker`], [`RationaleGenerator`] - Second-stage ranking and
//!   explanation, both with local fallbacks
//!
//! ## Scoring
//! - [`score_proficiency`], [`score_time`], [`score_location`] - The three
//!   rule-based criteria, each bounded to its own scale
//! - [`combine_scores`] - The weighted blend (no re-normalization)
//! - [`normalize_skill_entry`], [`normalize_skill_list`] - Total parsing of
//!   messy skill payloads
//!
//! ## Collaborators
//! - [`EmbeddingProvider`], [`RerankProvider`], [`TextGenerationProvider`] -
//!   The external AI services, as narrow traits
//! - [`DataAccess`] - Entity reads plus best-effort embedding persistence
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod dataaccess;
pub mod embedding;
pub mod matching;
pub mod model;
pub mod provider;
pub mod rationale;
pub mod rerank;
pub mod retrieval;
pub mod scoring;
pub mod skill;

pub use config::{ConfigError, MatchingConfig};
pub use constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_FINAL_K, DEFAULT_INITIAL_K};
pub use dataaccess::{DataAccess, DataAccessError};
#[cfg(any(test, feature = "mock"))]
pub use dataaccess::memory::InMemoryDataAccess;
pub use embedding::{
    EmbeddingResolver, ResolvedEmbedding, coerce_embedding, is_placeholder, placeholder,
    validate_embedding,
};
pub use matching::{MatchError, MatchOrchestrator};
pub use model::{
    Course, EntityId, EntityKind, MatchResult, OpportunityRef, Person, Project, ScoreBreakdown,
    Skill, SkillLevel,
};
pub use provider::http::{
    HttpEmbeddingProvider, HttpProviderConfig, HttpRerankProvider, HttpTextGenerationProvider,
};
#[cfg(any(test, feature = "mock"))]
pub use provider::mock::{MockEmbeddingProvider, MockRerankProvider, MockTextGenerationProvider};
pub use provider::{
    ApiKey, ChatMessage, EmbeddingProvider, ProviderError, RankedDocument, RerankProvider,
    TextGenerationProvider,
};
pub use rationale::{
    RATIONALE_EMPTY, RATIONALE_UNAVAILABLE, RationaleGenerator, fallback_rationale,
};
pub use rerank::{RankedCandidate, Reranker};
pub use retrieval::{RetrievedCandidate, cosine_similarity, top_k};
pub use scoring::{
    combine_scores, parse_weekly_hours, proficiency_level_weight, score_location,
    score_proficiency, score_time,
};
pub use skill::{normalize_skill_entry, normalize_skill_list, normalize_skills};
