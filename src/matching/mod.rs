//! The matching pipeline.
//!
//! Three public entry points share one state machine: resolve the query
//! embedding, retrieve the top `initial_k` candidates by cosine similarity,
//! score each against the rule-based criteria, rerank the top `final_k * 2`,
//! generate rationales for the winners, and return at most `final_k`
//! [`MatchResult`]s. Every provider failure along the way degrades locally;
//! the only reportable errors are unknown ids and a broken data store.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::future;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, MatchingConfig};
use crate::dataaccess::{DataAccess, DataAccessError};
use crate::embedding::EmbeddingResolver;
use crate::model::{
    Embeddable, EntityId, EntityKind, MatchResult, OpportunityRef, Person, ScoreBreakdown,
};
use crate::provider::{EmbeddingProvider, RerankProvider, TextGenerationProvider};
use crate::rationale::{RationaleGenerator, person_profile, target_profile};
use crate::rerank::Reranker;
use crate::retrieval;
use crate::scoring::{combine_scores, rank_descending, score_location, score_proficiency, score_time};

/// Errors a matching request can surface. Everything else degrades in place.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("person {id} not found")]
    PersonNotFound { id: EntityId },

    #[error("project {id} not found")]
    ProjectNotFound { id: EntityId },

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

/// One scored candidate on its way through rerank and rationale generation.
struct Candidate {
    id: EntityId,
    title: String,
    description: Option<String>,
    combined_text: String,
    breakdown: ScoreBreakdown,
    person_block: String,
    target_block: String,
}

/// Sequences the full matching pipeline over the collaborator interfaces.
pub struct MatchOrchestrator {
    data: Arc<dyn DataAccess>,
    resolver: EmbeddingResolver,
    reranker: Reranker,
    rationale: RationaleGenerator,
    config: MatchingConfig,
}

impl MatchOrchestrator {
    /// Builds an orchestrator after validating the configuration.
    pub fn new(
        data: Arc<dyn DataAccess>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        rerank_provider: Arc<dyn RerankProvider>,
        text_provider: Arc<dyn TextGenerationProvider>,
        config: MatchingConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let resolver = EmbeddingResolver::new(embedding_provider, config.embedding_dim);
        Ok(Self {
            data,
            resolver,
            reranker: Reranker::new(rerank_provider),
            rationale: RationaleGenerator::new(text_provider),
            config,
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Recommends projects for a person.
    pub async fn find_matching_projects(
        &self,
        person_id: EntityId,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let person = self
            .data
            .person(person_id)
            .await?
            .ok_or(MatchError::PersonNotFound { id: person_id })?;

        info!(person_id, "Finding matching projects");

        let Some(query_vector) = self
            .resolve_query(
                EntityKind::Person,
                person.id,
                &person.embedding,
                person.combined_text.as_deref(),
            )
            .await
        else {
            return Ok(Vec::new());
        };

        let pool = self.data.projects().await?;
        let resolved = self.resolve_pool(pool).await;
        if resolved.is_empty() {
            return Ok(Vec::new());
        }

        let (projects, vectors): (Vec<_>, Vec<_>) = resolved.into_iter().unzip();
        let hits = retrieval::top_k(&query_vector, &vectors, self.config.initial_k);

        let person_block = person_profile(&person);
        let candidates = hits
            .into_iter()
            .map(|hit| {
                let project = &projects[hit.index];
                let breakdown = self.score_candidate(
                    &person,
                    OpportunityRef::Project(project),
                    hit.similarity,
                );
                Candidate {
                    id: project.id,
                    title: project.title.clone(),
                    description: project.description.clone(),
                    combined_text: project.combined_text.clone().unwrap_or_default(),
                    breakdown,
                    person_block: person_block.clone(),
                    target_block: target_profile(&project.title, project.description.as_deref()),
                }
            })
            .collect();

        let query_text = person.combined_text.unwrap_or_default();
        Ok(self.finalize(&query_text, candidates).await)
    }

    /// Recommends courses for a person.
    pub async fn find_matching_courses(
        &self,
        person_id: EntityId,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let person = self
            .data
            .person(person_id)
            .await?
            .ok_or(MatchError::PersonNotFound { id: person_id })?;

        info!(person_id, "Finding matching courses");

        let Some(query_vector) = self
            .resolve_query(
                EntityKind::Person,
                person.id,
                &person.embedding,
                person.combined_text.as_deref(),
            )
            .await
        else {
            return Ok(Vec::new());
        };

        let pool = self.data.courses().await?;
        let resolved = self.resolve_pool(pool).await;
        if resolved.is_empty() {
            return Ok(Vec::new());
        }

        let (courses, vectors): (Vec<_>, Vec<_>) = resolved.into_iter().unzip();
        let hits = retrieval::top_k(&query_vector, &vectors, self.config.initial_k);

        let person_block = person_profile(&person);
        let candidates = hits
            .into_iter()
            .map(|hit| {
                let course = &courses[hit.index];
                let breakdown = self.score_candidate(
                    &person,
                    OpportunityRef::Course(course),
                    hit.similarity,
                );
                Candidate {
                    id: course.id,
                    title: course.title.clone(),
                    description: course.description.clone(),
                    combined_text: course.combined_text.clone().unwrap_or_default(),
                    breakdown,
                    person_block: person_block.clone(),
                    target_block: target_profile(&course.title, course.description.as_deref()),
                }
            })
            .collect();

        let query_text = person.combined_text.unwrap_or_default();
        Ok(self.finalize(&query_text, candidates).await)
    }

    /// Recommends people for a project.
    pub async fn find_matching_people(
        &self,
        project_id: EntityId,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let project = self
            .data
            .project(project_id)
            .await?
            .ok_or(MatchError::ProjectNotFound { id: project_id })?;

        info!(project_id, "Finding matching people");

        let Some(query_vector) = self
            .resolve_query(
                EntityKind::Project,
                project.id,
                &project.embedding,
                project.combined_text.as_deref(),
            )
            .await
        else {
            return Ok(Vec::new());
        };

        let pool = self.data.people().await?;
        let resolved = self.resolve_pool(pool).await;
        if resolved.is_empty() {
            return Ok(Vec::new());
        }

        let (people, vectors): (Vec<_>, Vec<_>) = resolved.into_iter().unzip();
        let hits = retrieval::top_k(&query_vector, &vectors, self.config.initial_k);

        let target_block = target_profile(&project.title, project.description.as_deref());
        let candidates = hits
            .into_iter()
            .map(|hit| {
                let person = &people[hit.index];
                let breakdown = self.score_candidate(
                    person,
                    OpportunityRef::Project(&project),
                    hit.similarity,
                );
                Candidate {
                    id: person.id,
                    title: person.name.clone(),
                    description: person.major.clone(),
                    combined_text: person.combined_text.clone().unwrap_or_default(),
                    breakdown,
                    person_block: person_profile(person),
                    target_block: target_block.clone(),
                }
            })
            .collect();

        let query_text = project.combined_text.unwrap_or_default();
        Ok(self.finalize(&query_text, candidates).await)
    }

    /// Scores one candidate pairing against the rule-based criteria.
    fn score_candidate(
        &self,
        person: &Person,
        opportunity: OpportunityRef<'_>,
        similarity: f32,
    ) -> ScoreBreakdown {
        let proficiency =
            score_proficiency(&person.skills, opportunity.required_skills(), &self.config);
        let time = score_time(person, opportunity, &self.config);
        let location = score_location(person.location.as_deref(), opportunity.location_target());

        combine_scores(similarity, proficiency, time, location, &self.config)
    }

    /// Resolves the query entity's embedding; `None` means the request yields
    /// no matches.
    async fn resolve_query(
        &self,
        kind: EntityKind,
        id: EntityId,
        stored: &Value,
        combined_text: Option<&str>,
    ) -> Option<Vec<f32>> {
        let resolved = self.resolver.resolve(kind, id, stored, combined_text).await;

        if resolved.is_placeholder() {
            warn!(kind = %kind, id, "Query embedding unresolvable, returning no matches");
            return None;
        }

        if resolved.regenerated {
            self.persist_best_effort(kind, id, &resolved.vector).await;
        }

        Some(resolved.vector)
    }

    /// Resolves a candidate pool's embeddings with bounded concurrency,
    /// dropping entries that stay on the placeholder vector.
    async fn resolve_pool<T: Embeddable>(&self, items: Vec<T>) -> Vec<(T, Vec<f32>)> {
        let total = items.len();

        let resolved: Vec<Option<(T, Vec<f32>)>> = futures_util::stream::iter(items)
            .map(|item| async move {
                let kind = item.entity_kind();
                let id = item.entity_id();
                let resolved = self
                    .resolver
                    .resolve(kind, id, item.stored_embedding(), item.embed_text())
                    .await;

                if resolved.is_placeholder() {
                    warn!(kind = %kind, id, "Dropping candidate without usable embedding");
                    return None;
                }

                if resolved.regenerated {
                    self.persist_best_effort(kind, id, &resolved.vector).await;
                }

                Some((item, resolved.vector))
            })
            .buffered(self.config.regen_concurrency)
            .collect()
            .await;

        let usable: Vec<(T, Vec<f32>)> = resolved.into_iter().flatten().collect();

        debug!(total, usable = usable.len(), "Candidate pool resolved");

        usable
    }

    async fn persist_best_effort(&self, kind: EntityKind, id: EntityId, vector: &[f32]) {
        if let Err(e) = self.data.persist_embedding(kind, id, vector).await {
            warn!(kind = %kind, id, error = %e, "Failed to persist regenerated embedding");
        }
    }

    /// Ranks, reranks, and annotates the scored candidates into the final
    /// result list.
    async fn finalize(&self, query_text: &str, mut candidates: Vec<Candidate>) -> Vec<MatchResult> {
        rank_descending(&mut candidates, |c| c.breakdown.combined);

        let window = candidates.len().min(self.config.final_k * 2);
        let documents: Vec<String> = candidates[..window]
            .iter()
            .map(|c| c.combined_text.clone())
            .collect();
        let fallback_scores: Vec<f32> = candidates[..window]
            .iter()
            .map(|c| c.breakdown.combined)
            .collect();

        let ranked = self
            .reranker
            .rerank_top(query_text, &documents, &fallback_scores, self.config.final_k)
            .await;

        // The winners are independent; their rationales are generated
        // concurrently and reassembled in rank order.
        let rationales = future::join_all(ranked.iter().map(|r| {
            let candidate = &candidates[r.candidate_index];
            self.rationale.generate(
                &candidate.person_block,
                &candidate.target_block,
                &candidate.breakdown,
            )
        }))
        .await;

        ranked
            .iter()
            .zip(rationales)
            .map(|(r, rationale)| {
                let candidate = &candidates[r.candidate_index];
                MatchResult {
                    id: candidate.id,
                    title: candidate.title.clone(),
                    description: candidate.description.clone(),
                    breakdown: candidate.breakdown,
                    relevance: r.relevance,
                    rationale: Some(rationale),
                }
            })
            .collect()
    }
}
