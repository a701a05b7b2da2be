//! Vector store trait for persisting and searching embedded chunks.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend holding one generation of embedded chunks, searchable
/// by vector similarity.
///
/// The store owns its entries exclusively: the only write operation is
/// [`rebuild`](VectorStore::rebuild), which replaces the entire previous
/// generation. Callers must be able to distinguish a store that was never
/// built (an error) from one that was built with zero entries (an empty
/// result); see the per-method contracts.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Replace all prior entries with the given set.
    ///
    /// Atomic from the caller's perspective: readers observe either the
    /// old generation or the complete new one, never a mix. On failure the
    /// previous generation must remain intact.
    ///
    /// Entries must have embeddings attached.
    async fn rebuild(&self, entries: &[Chunk]) -> Result<()>;

    /// Return the `top_k` entries most similar to `embedding`, ordered by
    /// descending cosine similarity.
    ///
    /// A `top_k` larger than the entry count returns all entries. An index
    /// built with zero entries returns an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexUnavailable`](crate::RagError::IndexUnavailable)
    /// if no rebuild has ever completed.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Number of persisted entries, for diagnostics.
    ///
    /// # Errors
    ///
    /// Same never-built discipline as [`search`](VectorStore::search).
    async fn count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
///
/// Both vectors are L2-normalized before computing the dot product. The
/// build-time and query-time vectors must come from the same embedding
/// model so the comparison is meaningful. Returns 0.0 if either vector
/// has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score all entries against a query embedding and keep the `top_k` best.
pub(crate) fn rank(entries: &[Chunk], embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
    let mut scored: Vec<SearchResult> = entries
        .iter()
        .map(|chunk| SearchResult {
            score: cosine_similarity(&chunk.embedding, embedding),
            chunk: chunk.clone(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}
