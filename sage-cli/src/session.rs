//! Chat session state and per-turn handling.
//!
//! The interactive loop owns a single [`ChatSession`] value holding the
//! retriever, assembler, and generator; each turn flows through
//! [`ChatSession::ask`] with no ambient state. Retrieval completes and its
//! results are frozen before the prompt is assembled, and the generator
//! always reads a fully-assembled, final prompt.

use sage_model::{GenerationError, Generator};
use sage_rag::{PromptAssembler, RagError, RagPipeline};

/// Everything that can go wrong inside one question/answer turn.
///
/// Turn errors are reported and swallowed at the loop boundary; a bad
/// interaction never terminates the session.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// Retrieval failed (embedding backend, vector store, missing index).
    #[error(transparent)]
    Rag(#[from] RagError),
    /// The generation backend failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Provenance of one retrieved chunk, for the citation list.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRef {
    /// Originating file name.
    pub source: String,
    /// 1-indexed page, when the source has pages.
    pub page: Option<u32>,
}

/// A completed answer with its supporting sources, in retrieval order.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The generated answer text.
    pub text: String,
    /// One entry per retrieved chunk, most similar first.
    pub sources: Vec<SourceRef>,
}

/// The state of one interactive chat session.
pub struct ChatSession {
    pipeline: RagPipeline,
    assembler: PromptAssembler,
    generator: Box<dyn Generator>,
}

impl ChatSession {
    /// Assemble a session from its three collaborators.
    pub fn new(
        pipeline: RagPipeline,
        assembler: PromptAssembler,
        generator: Box<dyn Generator>,
    ) -> Self {
        Self { pipeline, assembler, generator }
    }

    /// The generation model's name, for the banner.
    pub fn model_name(&self) -> &str {
        self.generator.name()
    }

    /// Run one full turn: retrieve → assemble → generate.
    pub async fn ask(&self, question: &str) -> Result<Answer, TurnError> {
        let results = self.pipeline.retrieve(question).await?;
        let prompt = self.assembler.assemble(question, &results);
        let generation = self.generator.generate(&prompt).await?;

        let sources = results
            .iter()
            .map(|r| SourceRef { source: r.chunk.source.clone(), page: r.chunk.page })
            .collect();

        Ok(Answer { text: generation.text.trim().to_string(), sources })
    }
}

/// Case-insensitive exit keywords for the interactive loop.
pub fn is_exit_word(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "quit" | "exit" | "bye")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use sage_model::MockGenerator;
    use sage_rag::embedding::EmbeddingProvider;
    use sage_rag::{Document, InMemoryVectorStore, RagConfig, RagPipeline};

    use super::*;

    struct ZeroEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ZeroEmbedder {
        async fn embed(&self, _text: &str) -> sage_rag::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn session_over(store: Arc<InMemoryVectorStore>) -> ChatSession {
        let pipeline = RagPipeline::builder()
            .config(RagConfig::default())
            .embedding_provider(Arc::new(ZeroEmbedder))
            .vector_store(store)
            .build()
            .unwrap();
        ChatSession::new(
            pipeline,
            PromptAssembler::default(),
            Box::new(MockGenerator::new("a grounded answer")),
        )
    }

    #[test]
    fn exit_words_match_case_insensitively() {
        assert!(is_exit_word("quit"));
        assert!(is_exit_word("EXIT"));
        assert!(is_exit_word("  Bye  "));
        assert!(!is_exit_word("exit please"));
        assert!(!is_exit_word("what is quicksort?"));
    }

    #[tokio::test]
    async fn a_turn_produces_answer_text_and_sources() {
        let store = Arc::new(InMemoryVectorStore::new());
        let session = session_over(store.clone());

        // Build a one-chunk index through the session's own pipeline setup.
        let pipeline = RagPipeline::builder()
            .config(RagConfig::default())
            .embedding_provider(Arc::new(ZeroEmbedder))
            .vector_store(store)
            .build()
            .unwrap();
        pipeline
            .rebuild_index(&[Document::page("book.pdf", 4, "recursion explained")])
            .await
            .unwrap();

        let answer = session.ask("what is recursion?").await.unwrap();
        assert_eq!(answer.text, "a grounded answer");
        assert_eq!(
            answer.sources,
            vec![SourceRef { source: "book.pdf".to_string(), page: Some(4) }]
        );
    }

    #[tokio::test]
    async fn asking_before_a_build_surfaces_index_unavailable() {
        let session = session_over(Arc::new(InMemoryVectorStore::new()));
        let err = session.ask("anything").await.unwrap_err();
        assert!(matches!(err, TurnError::Rag(RagError::IndexUnavailable)));
    }
}
