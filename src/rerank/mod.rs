//! Second-stage reordering of the scored shortlist.
//!
//! The reranker hands the top `final_k * 2` candidates' combined texts to the
//! [`RerankProvider`](crate::provider::RerankProvider) and keeps the first
//! `final_k` answers. Any failure (missing credential, empty inputs, provider
//! error, unusable result) falls back to the weighted-score order with the
//! combined score standing in as relevance. The two relevance kinds are not
//! on the same scale; `via_rerank` records which one applies.


use std::sync::Arc;

use tracing::{debug, warn};

use crate::provider::RerankProvider;

/// One shortlist position after reranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    /// Index into the submitted document window.
    pub candidate_index: usize,
    /// Cross-encoder score, or the fallback combined score.
    pub relevance: f32,
    /// `true` when `relevance` came from the rerank provider.
    pub via_rerank: bool,
}

pub struct Reranker {
    provider: Arc<dyn RerankProvider>,
}

impl Reranker {
    pub fn new(provider: Arc<dyn RerankProvider>) -> Self {
        Self { provider }
    }

    /// Reorders the document window, returning at most `final_k` entries.
    ///
    /// `documents` and `fallback_scores` run parallel: entry `i` of both
    /// describes the same candidate, already in weighted-score order.
    pub async fn rerank_top(
        &self,
        query: &str,
        documents: &[String],
        fallback_scores: &[f32],
        final_k: usize,
    ) -> Vec<RankedCandidate> {
        debug_assert_eq!(documents.len(), fallback_scores.len());

        if documents.is_empty() || query.trim().is_empty() {
            return self.fallback(fallback_scores, final_k);
        }

        if !self.provider.is_configured() {
            debug!("Rerank provider unconfigured, keeping weighted order");
            return self.fallback(fallback_scores, final_k);
        }

        match self.provider.rerank(query, documents).await {
            Ok(results) => {
                let ranked: Vec<RankedCandidate> = results
                    .into_iter()
                    .filter(|result| result.index < documents.len())
                    .take(final_k)
                    .map(|result| RankedCandidate {
                        candidate_index: result.index,
                        relevance: result.relevance_score,
                        via_rerank: true,
                    })
                    .collect();

                if ranked.is_empty() {
                    warn!("Rerank returned no usable results, keeping weighted order");
                    return self.fallback(fallback_scores, final_k);
                }

                debug!(
                    top_relevance = ranked.first().map(|r| r.relevance),
                    "Rerank complete"
                );
                ranked
            }
            Err(e) => {
                warn!(error = %e, "Rerank failed, keeping weighted order");
                self.fallback(fallback_scores, final_k)
            }
        }
    }

    fn fallback(&self, fallback_scores: &[f32], final_k: usize) -> Vec<RankedCandidate> {
        fallback_scores
            .iter()
            .take(final_k)
            .enumerate()
            .map(|(candidate_index, &relevance)| RankedCandidate {
                candidate_index,
                relevance,
                via_rerank: false,
            })
            .collect()
    }
}
