//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// A unit of raw source text with provenance, as produced by the loaders.
///
/// Paged sources (PDFs) yield one `Document` per page with `page` set to
/// the 1-indexed page number; unpaged sources (DOCX, TXT) yield a single
/// `Document` with `page` left as `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The originating file name, carried through for citation.
    pub source: String,
    /// 1-indexed page number, if the source has pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// The raw text content.
    pub text: String,
}

impl Document {
    /// Create an unpaged document.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self { source: source.into(), page: None, text: text.into() }
    }

    /// Create a document for one page of a paged source.
    pub fn page(source: impl Into<String>, page: u32, text: impl Into<String>) -> Self {
        Self { source: source.into(), page: Some(page), text: text.into() }
    }
}

/// A bounded segment of a [`Document`], the atomic retrieval unit.
///
/// Chunks are immutable once produced by the chunker; the pipeline attaches
/// the embedding before the chunk reaches the vector store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// The originating file name, inherited from the parent document.
    pub source: String,
    /// 1-indexed page number of the originating span, if paged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Position of this chunk within its source, for ordering and debugging.
    pub sequence: usize,
    /// The vector embedding for this chunk's text. Empty until the
    /// pipeline attaches it.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with its similarity score.
///
/// Read-only query output; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}
