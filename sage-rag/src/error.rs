//! Error types for the `sage-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The chunker was handed an empty document set.
    #[error("no documents were loaded; nothing to chunk")]
    EmptyInput,

    /// An error occurred during embedding generation.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A query was attempted before any index has been built.
    ///
    /// Distinct from querying an index that was built with zero entries,
    /// which succeeds with an empty result.
    #[error("no index has been built yet")]
    IndexUnavailable,

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
