//! Deterministic in-process providers for tests and offline development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{
    ChatMessage, EmbeddingProvider, ProviderError, RankedDocument, RerankProvider,
    TextGenerationProvider,
};

/// Embedding provider returning registered vectors, or a deterministic
/// text-derived vector for anything unregistered.
pub struct MockEmbeddingProvider {
    dim: usize,
    configured: bool,
    fail: bool,
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            configured: true,
            fail: false,
            vectors: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider without a usable credential.
    pub fn unconfigured(dim: usize) -> Self {
        Self {
            configured: false,
            ..Self::new(dim)
        }
    }

    /// Provider whose every call errors.
    pub fn failing(dim: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(dim)
        }
    }

    /// Registers the vector returned for an exact input text.
    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors
            .lock()
            .expect("mock vector lock")
            .insert(text.into(), vector);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Deterministic non-zero vector derived from the text bytes.
    fn derive_vector(&self, text: &str) -> Vec<f32> {
        let seed: u32 = text.bytes().map(u32::from).sum::<u32>() % 97 + 1;
        (0..self.dim)
            .map(|i| ((seed + i as u32) % 97 + 1) as f32 / 97.0)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.configured {
            return Err(ProviderError::Unconfigured);
        }
        if self.fail {
            return Err(ProviderError::Request("mock embedding failure".to_string()));
        }

        let vectors = self.vectors.lock().expect("mock vector lock");
        Ok(texts
            .iter()
            .map(|text| {
                vectors
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| self.derive_vector(text))
            })
            .collect())
    }
}

/// Rerank provider replaying a scripted result, or scoring documents in
/// submission order when unscripted.
pub struct MockRerankProvider {
    configured: bool,
    fail: bool,
    scripted: Option<Vec<RankedDocument>>,
    calls: AtomicUsize,
}

impl MockRerankProvider {
    pub fn new() -> Self {
        Self {
            configured: true,
            fail: false,
            scripted: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Replays exactly these results on every call.
    pub fn scripted(results: Vec<RankedDocument>) -> Self {
        Self {
            scripted: Some(results),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRerankProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RerankProvider for MockRerankProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn rerank(
        &self,
        _query: &str,
        documents: &[String],
    ) -> Result<Vec<RankedDocument>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.configured {
            return Err(ProviderError::Unconfigured);
        }
        if self.fail {
            return Err(ProviderError::Request("mock rerank failure".to_string()));
        }

        if let Some(results) = &self.scripted {
            return Ok(results.clone());
        }

        Ok(documents
            .iter()
            .enumerate()
            .map(|(index, _)| RankedDocument {
                index,
                relevance_score: 1.0 - index as f32 * 0.01,
            })
            .collect())
    }
}

/// Text generation provider returning a fixed reply.
pub struct MockTextGenerationProvider {
    configured: bool,
    fail: bool,
    reply: String,
    calls: AtomicUsize,
}

impl MockTextGenerationProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            configured: true,
            fail: false,
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new("")
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerationProvider for MockTextGenerationProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.configured {
            return Err(ProviderError::Unconfigured);
        }
        if self.fail {
            return Err(ProviderError::Request("mock completion failure".to_string()));
        }

        Ok(self.reply.clone())
    }
}
