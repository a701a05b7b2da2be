//! # sage-model
//!
//! The generation side of the sage study assistant: a narrow
//! prompt-in/text-out contract over an external language model.
//!
//! [`Generator`] is the seam; [`OllamaGenerator`] is the production
//! adapter and [`MockGenerator`] the deterministic test double. Sampling
//! parameters are fixed at construction time, not per call: one model,
//! one temperament, for the whole session.

use async_trait::async_trait;
use thiserror::Error;

pub mod mock;
pub mod ollama;

pub use mock::MockGenerator;
pub use ollama::{GenerationConfig, OllamaGenerator};

/// Errors from the generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend is unreachable or the model is not loaded. Callers
    /// present this with a remediation hint (start the backing service)
    /// and keep their session alive.
    #[error("generation backend unavailable ({provider}): {message}")]
    Unavailable {
        /// The generation backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The backend answered, but with an error or an unparseable body.
    #[error("generation failed ({provider}): {message}")]
    Api {
        /// The generation backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// A completed generation: the answer text plus raw call metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// The generated answer text.
    pub text: String,
    /// The model that produced it.
    pub model: String,
    /// Total wall-clock duration reported by the backend, nanoseconds.
    pub total_duration_ns: Option<u64>,
    /// Number of tokens generated, as reported by the backend.
    pub eval_count: Option<u64>,
}

/// A generative language model behind a single blocking call.
///
/// The call contract is deliberately narrow: a fully assembled prompt in,
/// a completion out. No streaming, no tool calls, no per-call parameter
/// overrides.
#[async_trait]
pub trait Generator: Send + Sync {
    /// The model name, for banners and logs.
    fn name(&self) -> &str;

    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<Generation>;
}
