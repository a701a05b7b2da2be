//! # sage-rag
//!
//! The retrieval core of the sage study assistant: split documents into
//! overlapping chunks, embed them, persist them in a vector index, and
//! retrieve the most relevant chunks for a question.
//!
//! ## Overview
//!
//! - [`chunking`]: recursive separator-priority splitter with overlap
//! - [`embedding`]: [`EmbeddingProvider`] trait and the Ollama adapter
//! - [`vectorstore`]: [`VectorStore`] trait with persistent and in-memory
//!   implementations
//! - [`pipeline`]: [`RagPipeline`], the rebuild/retrieve orchestrator
//! - [`prompt`]: [`PromptAssembler`], grounded prompt construction
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sage_rag::{JsonFileVectorStore, OllamaEmbeddingProvider, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OllamaEmbeddingProvider::new()))
//!     .vector_store(Arc::new(JsonFileVectorStore::open("./index")?))
//!     .build()?;
//!
//! pipeline.rebuild_index(&documents).await?;
//! let results = pipeline.retrieve("what is a binary search?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod jsonfile;
pub mod ollama;
pub mod pipeline;
pub mod prompt;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use jsonfile::JsonFileVectorStore;
pub use ollama::OllamaEmbeddingProvider;
pub use pipeline::{BuildReport, RagPipeline, RagPipelineBuilder};
pub use prompt::PromptAssembler;
pub use vectorstore::VectorStore;
