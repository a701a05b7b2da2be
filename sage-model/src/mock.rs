//! Deterministic generator double for tests.

use async_trait::async_trait;

use crate::{Generation, Generator, Result};

/// A [`Generator`] that returns a fixed reply, recording nothing.
///
/// # Example
///
/// ```rust,ignore
/// use sage_model::{Generator, MockGenerator};
///
/// let generator = MockGenerator::new("a canned answer");
/// let generation = generator.generate("any prompt").await?;
/// assert_eq!(generation.text, "a canned answer");
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator {
    reply: String,
}

impl MockGenerator {
    /// Create a mock that always answers with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<Generation> {
        Ok(Generation {
            text: self.reply.clone(),
            model: "mock".to_string(),
            total_duration_ns: None,
            eval_count: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_the_fixed_reply() {
        let generator = MockGenerator::new("grounded answer");
        let generation = generator.generate("ignored").await.unwrap();
        assert_eq!(generation.text, "grounded answer");
        assert_eq!(generator.name(), "mock");
    }
}
