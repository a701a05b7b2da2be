//! Document chunking.
//!
//! [`RecursiveChunker`] splits raw document text into bounded, overlapping
//! chunks by recursively trying an ordered ladder of separators: paragraph
//! break, line break, sentence boundary, word boundary, and finally single
//! characters. The earliest separator level that yields segments within the
//! size cap wins, so chunks break on the most natural boundary available.

use std::collections::HashMap;

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// Separator ladder, tried in order. Character-level splitting is the
/// implicit last resort once the ladder is exhausted.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", " "];

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and provenance but no
/// embeddings; embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a set of documents into an ordered chunk sequence.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`] if `documents` is empty. Documents
    /// whose text is empty or whitespace-only contribute no chunks.
    fn chunk(&self, documents: &[Document]) -> Result<Vec<Chunk>>;
}

/// Splits text recursively on the separator ladder, carrying overlap
/// between consecutive chunks of the same document.
///
/// Each chunk after the first within one document is seeded with up to
/// `chunk_overlap` trailing characters of its predecessor, so context is
/// not lost at a split boundary. `chunk_overlap` must be strictly less
/// than `chunk_size`; [`crate::RagConfigBuilder`] enforces this.
///
/// Given identical input and configuration the output is byte-identical:
/// the splitter is a pure transform with no hidden state.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per chunk
    /// * `chunk_overlap`: trailing characters repeated between consecutive
    ///   chunks; must be less than `chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Split one document's text into chunk strings.
    fn split_text(&self, text: &str) -> Vec<String> {
        let atoms = split_atoms(text, self.chunk_size, SEPARATORS);
        merge_atoms(atoms, self.chunk_size, self.chunk_overlap)
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        if documents.is_empty() {
            return Err(RagError::EmptyInput);
        }

        // Sequence numbers count chunks per source file, not per page, so a
        // chunk's position is meaningful across a multi-page document.
        let mut sequences: HashMap<String, usize> = HashMap::new();
        let mut chunks = Vec::new();

        for document in documents {
            if document.text.trim().is_empty() {
                continue;
            }
            for text in self.split_text(&document.text) {
                if text.trim().is_empty() {
                    continue;
                }
                let sequence = sequences.entry(document.source.clone()).or_insert(0);
                chunks.push(Chunk {
                    text,
                    source: document.source.clone(),
                    page: document.page,
                    sequence: *sequence,
                    embedding: Vec::new(),
                });
                *sequence += 1;
            }
        }

        Ok(chunks)
    }
}

/// Recursively split `text` into atoms no longer than `max` characters,
/// preferring the earliest separator level that fits.
///
/// A segment that still exceeds `max` after the ladder is exhausted is cut
/// at character boundaries as the final fallback.
fn split_atoms(text: &str, max: usize, separators: &[&str]) -> Vec<String> {
    if char_len(text) <= max {
        return vec![text.to_string()];
    }

    let Some((separator, rest)) = separators.split_first() else {
        return split_chars(text, max);
    };

    let mut atoms = Vec::new();
    for segment in split_keeping_separator(text, separator) {
        if char_len(segment) <= max {
            atoms.push(segment.to_string());
        } else {
            atoms.extend(split_atoms(segment, max, rest));
        }
    }
    atoms
}

/// Merge atoms into chunks of at most `max` characters, seeding each chunk
/// after the first with the tail of its predecessor.
///
/// The seed is trimmed below `overlap` when the incoming atom would
/// otherwise push the chunk over `max`, so the size cap always wins over
/// the overlap target.
fn merge_atoms(atoms: Vec<String>, max: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for atom in atoms {
        let atom_len = char_len(&atom);
        if current_len > 0 && current_len + atom_len > max {
            let mut seed = char_tail(&current, overlap).to_string();
            if char_len(&seed) + atom_len > max {
                let room = max.saturating_sub(atom_len);
                seed = char_tail(&seed, room).to_string();
            }
            chunks.push(std::mem::replace(&mut current, seed));
            current_len = char_len(&current);
        }
        current.push_str(&atom);
        current_len += atom_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so concatenating the segments reproduces the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Cut text into pieces of at most `max` characters, on char boundaries.
fn split_chars(text: &str, max: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        if count == max {
            pieces.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The suffix of `s` holding its last `n` characters.
fn char_tail(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
