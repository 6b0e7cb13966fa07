//! Stored-embedding validation and lazy regeneration.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{EntityId, EntityKind};
use crate::provider::EmbeddingProvider;

/// The all-zero placeholder vector: "no valid embedding available".
pub fn placeholder(dim: usize) -> Vec<f32> {
    vec![0.0; dim]
}

/// Whether a vector is the all-zero placeholder.
pub fn is_placeholder(vector: &[f32]) -> bool {
    vector.iter().all(|v| *v == 0.0)
}

/// Coerces a stored raw embedding into a numeric vector.
///
/// Accepts an already-numeric array, a JSON-encoded array string, or nothing.
/// Any element that is not a finite-representable number rejects the whole
/// value.
pub fn coerce_embedding(raw: &Value) -> Option<Vec<f32>> {
    match raw {
        Value::Array(items) => numeric_vector(items),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => numeric_vector(&items),
            _ => None,
        },
        _ => None,
    }
}

fn numeric_vector(items: &[Value]) -> Option<Vec<f32>> {
    items
        .iter()
        .map(|item| item.as_f64().map(|v| v as f32))
        .collect()
}

/// Validates shape and content: exact dimension, finite values, not the
/// placeholder.
pub fn validate_embedding(vector: &[f32], dim: usize) -> bool {
    vector.len() == dim && vector.iter().all(|v| v.is_finite()) && !is_placeholder(vector)
}

/// A vector handed back by [`EmbeddingResolver::resolve`].
#[derive(Debug, Clone)]
pub struct ResolvedEmbedding {
    pub vector: Vec<f32>,
    /// `true` when the vector came fresh from the provider; the caller should
    /// hand it to the data layer for persistence.
    pub regenerated: bool,
}

impl ResolvedEmbedding {
    pub fn is_placeholder(&self) -> bool {
        is_placeholder(&self.vector)
    }
}

/// Resolves an entity's embedding: validates the stored value and falls back
/// to provider regeneration, degrading to the placeholder vector on every
/// failure path. Never errors.
pub struct EmbeddingResolver {
    provider: Arc<dyn EmbeddingProvider>,
    dim: usize,
}

impl EmbeddingResolver {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, dim: usize) -> Self {
        Self { provider, dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Resolves one entity's vector from its stored raw value and, when that
    /// is unusable, from the provider via the entity's combined text.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        id: EntityId,
        stored: &Value,
        combined_text: Option<&str>,
    ) -> ResolvedEmbedding {
        if let Some(vector) = coerce_embedding(stored) {
            if validate_embedding(&vector, self.dim) {
                return ResolvedEmbedding {
                    vector,
                    regenerated: false,
                };
            }
            warn!(
                kind = %kind,
                id,
                len = vector.len(),
                "Stored embedding invalid, attempting regeneration"
            );
        } else if !stored.is_null() {
            warn!(kind = %kind, id, "Stored embedding unreadable, attempting regeneration");
        }

        self.regenerate(kind, id, combined_text).await
    }

    async fn regenerate(
        &self,
        kind: EntityKind,
        id: EntityId,
        combined_text: Option<&str>,
    ) -> ResolvedEmbedding {
        if !self.provider.is_configured() {
            warn!(kind = %kind, id, "No usable embedding credential, using placeholder");
            return self.placeholder_result();
        }

        let Some(text) = combined_text.filter(|text| !text.trim().is_empty()) else {
            warn!(kind = %kind, id, "No combined text to embed, using placeholder");
            return self.placeholder_result();
        };

        match self.provider.embed(&[text.to_string()]).await {
            Ok(mut vectors) if !vectors.is_empty() => {
                let vector = vectors.swap_remove(0);
                if validate_embedding(&vector, self.dim) {
                    debug!(kind = %kind, id, "Embedding regenerated");
                    ResolvedEmbedding {
                        vector,
                        regenerated: true,
                    }
                } else {
                    warn!(
                        kind = %kind,
                        id,
                        len = vector.len(),
                        "Regenerated embedding invalid, using placeholder"
                    );
                    self.placeholder_result()
                }
            }
            Ok(_) => {
                warn!(kind = %kind, id, "Embedding provider returned no vectors");
                self.placeholder_result()
            }
            Err(e) => {
                warn!(kind = %kind, id, error = %e, "Embedding regeneration failed");
                self.placeholder_result()
            }
        }
    }

    fn placeholder_result(&self) -> ResolvedEmbedding {
        ResolvedEmbedding {
            vector: placeholder(self.dim),
            regenerated: false,
        }
    }
}
