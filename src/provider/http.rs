//! HTTP adapters for the platform's OpenAI-compatible AI endpoints.
//!
//! Thin request/response mapping only; no retries, no caching. Each adapter
//! checks credential usability before issuing a request so unconfigured
//! deployments degrade without network traffic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

use super::{
    ApiKey, ChatMessage, EmbeddingProvider, ProviderError, RankedDocument, RerankProvider,
    TextGenerationProvider,
};

const DEFAULT_BASE_URL: &str = "https://api.siliconflow.cn/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-large-zh-v1.5";
const DEFAULT_RERANK_MODEL: &str = "BAAI/bge-reranker-v2-m3";
const DEFAULT_CHAT_MODEL: &str = "Qwen/Qwen2.5-7B-Instruct";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by the three adapters.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub base_url: String,
    pub api_key: ApiKey,
    pub embedding_model: String,
    pub rerank_model: String,
    pub chat_model: String,
}

impl HttpProviderConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    /// Reads `CAMPUS_MATCH_API_KEY` and optional `CAMPUS_MATCH_API_BASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::new(ApiKey::from_env("CAMPUS_MATCH_API_KEY"));
        if let Ok(base_url) = std::env::var("CAMPUS_MATCH_API_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn build_client() -> HttpClient {
    HttpClient::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

async fn post_json<T: for<'de> Deserialize<'de>>(
    http: &HttpClient,
    url: &str,
    api_key: &ApiKey,
    body: &serde_json::Value,
) -> Result<T, ProviderError> {
    let response = http
        .post(url)
        .bearer_auth(api_key.expose())
        .json(body)
        .send()
        .await
        .map_err(|e| ProviderError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))
}

/// Embedding generation over `POST /embeddings`.
pub struct HttpEmbeddingProvider {
    http: HttpClient,
    config: HttpProviderConfig,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl HttpEmbeddingProvider {
    pub fn new(config: HttpProviderConfig) -> Self {
        Self {
            http: build_client(),
            config,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_usable()
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Unconfigured);
        }

        debug!(count = texts.len(), "Requesting embeddings");

        let body = serde_json::json!({
            "model": self.config.embedding_model,
            "input": texts,
        });

        let response: EmbeddingsResponse = post_json(
            &self.http,
            &self.config.endpoint("embeddings"),
            &self.config.api_key,
            &body,
        )
        .await?;

        if response.data.len() != texts.len() {
            return Err(ProviderError::UnexpectedResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|datum| datum.index);
        Ok(data.into_iter().map(|datum| datum.embedding).collect())
    }
}

/// Cross-encoder reranking over `POST /rerank`.
pub struct HttpRerankProvider {
    http: HttpClient,
    config: HttpProviderConfig,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RankedDocument>,
}

impl HttpRerankProvider {
    pub fn new(config: HttpProviderConfig) -> Self {
        Self {
            http: build_client(),
            config,
        }
    }
}

#[async_trait]
impl RerankProvider for HttpRerankProvider {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_usable()
    }

    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
    ) -> Result<Vec<RankedDocument>, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Unconfigured);
        }

        debug!(documents = documents.len(), "Requesting rerank");

        let body = serde_json::json!({
            "model": self.config.rerank_model,
            "query": query,
            "documents": documents,
            "top_n": documents.len(),
            "return_documents": false,
        });

        let response: RerankResponse = post_json(
            &self.http,
            &self.config.endpoint("rerank"),
            &self.config.api_key,
            &body,
        )
        .await?;

        Ok(response.results)
    }
}

/// Chat completion over `POST /chat/completions`.
pub struct HttpTextGenerationProvider {
    http: HttpClient,
    config: HttpProviderConfig,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl HttpTextGenerationProvider {
    pub fn new(config: HttpProviderConfig) -> Self {
        Self {
            http: build_client(),
            config,
        }
    }
}

#[async_trait]
impl TextGenerationProvider for HttpTextGenerationProvider {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_usable()
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Unconfigured);
        }

        let body = serde_json::json!({
            "model": self.config.chat_model,
            "messages": messages,
        });

        let response: ChatResponse = post_json(
            &self.http,
            &self.config.endpoint("chat/completions"),
            &self.config.api_key,
            &body,
        )
        .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::UnexpectedResponse("no completion choices".to_string()))
    }
}
