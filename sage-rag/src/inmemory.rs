//! In-memory vector store.
//!
//! [`InMemoryVectorStore`] keeps the current generation in a
//! `tokio::sync::RwLock`. Nothing survives the process; it exists for
//! tests and for development without an index directory.

use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, rank};

/// An in-memory [`VectorStore`] using cosine similarity for search.
///
/// `None` means no rebuild has ever run; `Some(vec![])` is a built-empty
/// index. The two states answer queries differently, per the trait
/// contract.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Option<Vec<Chunk>>>,
}

impl InMemoryVectorStore {
    /// Create a new store with no generation built yet.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn rebuild(&self, entries: &[Chunk]) -> Result<()> {
        let mut guard = self.entries.write().await;
        *guard = Some(entries.to_vec());
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let guard = self.entries.read().await;
        let entries = guard.as_ref().ok_or(RagError::IndexUnavailable)?;
        Ok(rank(entries, embedding, top_k))
    }

    async fn count(&self) -> Result<usize> {
        let guard = self.entries.read().await;
        let entries = guard.as_ref().ok_or(RagError::IndexUnavailable)?;
        Ok(entries.len())
    }
}
