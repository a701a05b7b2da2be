//! Ollama generation adapter using the local Ollama HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{Generation, GenerationError, Generator, Result};

/// The default Ollama server address.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default generation model.
const DEFAULT_MODEL: &str = "phi3";

/// Sampling parameters, fixed at construction time.
///
/// The defaults favor focused, grounded tutoring answers: low temperature
/// for determinism, mild nucleus sampling for analogies, a repetition
/// penalty, and a bounded output length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    /// Repetition penalty.
    pub repeat_penalty: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Context window size the model is run with.
    pub context_window: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            repeat_penalty: 1.1,
            max_tokens: 1024,
            context_window: 4096,
        }
    }
}

/// A [`Generator`] backed by a local Ollama server.
///
/// Uses `reqwest` to call `/api/generate` without streaming. The model
/// must already be pulled (`ollama pull phi3`) and the server running
/// (`ollama serve`); an unreachable server surfaces as
/// [`GenerationError::Unavailable`].
///
/// # Example
///
/// ```rust,ignore
/// use sage_model::{Generator, OllamaGenerator};
///
/// let generator = OllamaGenerator::new("phi3");
/// let generation = generator.generate("Explain binary search.").await?;
/// println!("{}", generation.text);
/// ```
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    config: GenerationConfig,
}

impl OllamaGenerator {
    /// Create a generator for the given model with default sampling
    /// parameters and server address.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: model.into(),
            config: GenerationConfig::default(),
        }
    }

    /// Create a generator for the default model (`phi3`).
    pub fn default_model() -> Self {
        Self::new(DEFAULT_MODEL)
    }

    /// Set the Ollama server address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the sampling parameters.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Ollama's names for the sampling knobs.
#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
    num_predict: u32,
    num_ctx: u32,
}

impl From<&GenerationConfig> for GenerateOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            repeat_penalty: config.repeat_penalty,
            num_predict: config.max_tokens,
            num_ctx: config.context_window,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── Generator implementation ───────────────────────────────────────

#[async_trait]
impl Generator for OllamaGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Generation> {
        debug!(
            provider = "Ollama",
            model = %self.model,
            prompt_len = prompt.len(),
            "generating completion"
        );

        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions::from(&self.config),
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Ollama", error = %e, "generate request failed");
                GenerationError::Unavailable {
                    provider: "Ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = "Ollama", %status, "generate API error");
            // A 404 here means the model is not pulled: the backend is
            // present but cannot serve this model, so it still counts as
            // unavailable for the caller's remediation message.
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(GenerationError::Unavailable {
                    provider: "Ollama".into(),
                    message: format!("model '{}' not found: {detail}", self.model),
                });
            }
            return Err(GenerationError::Api {
                provider: "Ollama".into(),
                message: format!("server returned {status}: {detail}"),
            });
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse generate response");
            GenerationError::Api {
                provider: "Ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(Generation {
            text: generate_response.response,
            model: self.model.clone(),
            total_duration_ns: generate_response.total_duration,
            eval_count: generate_response.eval_count,
        })
    }
}
