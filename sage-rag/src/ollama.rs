//! Ollama embedding provider using the local Ollama HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Ollama server address.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default embedding model.
const DEFAULT_MODEL: &str = "all-minilm";

/// The dimensionality of `all-minilm` embeddings.
const DEFAULT_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] backed by a local Ollama server.
///
/// Uses `reqwest` to call the `/api/embed` endpoint directly. The model
/// must already be pulled (`ollama pull all-minilm`) and the server
/// running (`ollama serve`); failures surface as
/// [`RagError::Embedding`] so callers can print those remediation hints.
///
/// # Example
///
/// ```rust,ignore
/// use sage_rag::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), 384);
/// ```
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbeddingProvider {
    /// Create a provider with the default server address and model.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Set the Ollama server address (e.g. `http://remote-host:11434`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the embedding model name.
    ///
    /// Pair with [`with_dimensions`](Self::with_dimensions) when the model
    /// does not produce 384-dimensional vectors.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the dimensionality reported by [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }

    fn embed_url(&self) -> String {
        format!("{}/api/embed", self.base_url.trim_end_matches('/'))
    }
}

impl Default for OllamaEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: "Ollama".into(),
            message: "server returned no embedding".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "Ollama",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = EmbedRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .post(self.embed_url())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Ollama", error = %e, "embed request failed");
                RagError::Embedding {
                    provider: "Ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = "Ollama", %status, "embed API error");
            return Err(RagError::Embedding {
                provider: "Ollama".into(),
                message: format!("server returned {status}: {detail}"),
            });
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse embed response");
            RagError::Embedding {
                provider: "Ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(RagError::Embedding {
                provider: "Ollama".into(),
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    embed_response.embeddings.len()
                ),
            });
        }

        Ok(embed_response.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
