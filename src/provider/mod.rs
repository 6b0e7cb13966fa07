//! Collaborator interfaces for the three external AI services.
//!
//! The matching core only ever talks to narrow traits: embedding generation,
//! cross-encoder reranking, and chat-style text generation. The HTTP adapters
//! in [`http`] speak the platform's OpenAI-compatible REST endpoints; retry
//! and caching policy belong to the services behind them, not here. Mocks
//! live in [`mock`] behind `#[cfg(any(test, feature = "mock"))]`.

pub mod http;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Placeholder key some client builds ship; treated as no credential at all.
pub const DUMMY_API_KEY: &str = "dummy_key";

/// Errors produced by provider calls. All of them are recoverable: callers
/// degrade to a local fallback instead of propagating.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider credential missing or unusable")]
    Unconfigured,

    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),
}

/// An API credential plus its usability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Reads the key from an environment variable; missing variables produce
    /// an unusable key rather than an error.
    pub fn from_env(var: &str) -> Self {
        Self(std::env::var(var).unwrap_or_default())
    }

    /// A key is usable when present and not the dummy placeholder.
    pub fn is_usable(&self) -> bool {
        !self.0.trim().is_empty() && self.0 != DUMMY_API_KEY
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// One message of a chat-completion prompt.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// A reranked document reference: position in the submitted document list
/// plus the cross-encoder relevance.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct RankedDocument {
    pub index: usize,
    pub relevance_score: f32,
}

/// Produces one embedding vector per input text, same order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Whether a usable credential is present. Callers short-circuit to their
    /// degraded path when this is `false`.
    fn is_configured(&self) -> bool {
        true
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Scores `documents` against `query` with a cross-encoder.
#[async_trait]
pub trait RerankProvider: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    /// Returns ranked references, most relevant first. `index` points into
    /// `documents`.
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
    ) -> Result<Vec<RankedDocument>, ProviderError>;
}

/// Chat-style text generation.
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
}
