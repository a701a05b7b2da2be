//! Persistent vector store backed by a single JSON generation file.
//!
//! [`JsonFileVectorStore`] keeps the active generation in
//! `<dir>/index.json` and an in-process cache behind a
//! `tokio::sync::RwLock`. A rebuild serializes the new generation to a
//! sibling staging file and atomically renames it over the active file, so
//! a failure at any point before the rename leaves the previous generation
//! fully intact and readers never observe a mixed generation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, rank};

/// Active generation file name inside the index directory.
const INDEX_FILE: &str = "index.json";

/// Staging file for the generation being built.
const STAGING_FILE: &str = "index.json.tmp";

/// A [`VectorStore`] persisted as one JSON file per generation.
///
/// "Never built" is represented by the absence of `index.json`; an index
/// built from zero chunks is a present file holding an empty array. The
/// file format is an implementation detail; callers only rely on the
/// rebuild/search semantics.
#[derive(Debug)]
pub struct JsonFileVectorStore {
    dir: PathBuf,
    cache: RwLock<Option<Vec<Chunk>>>,
}

impl JsonFileVectorStore {
    /// Open a store rooted at `dir`, creating the directory if absent.
    ///
    /// Opening never reads the index; entries are loaded lazily on the
    /// first search or count.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            store_error(format!("failed to create index directory {}: {e}", dir.display()))
        })?;
        Ok(Self { dir, cache: RwLock::new(None) })
    }

    /// The directory this store persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The first `limit` persisted entries, in build order. Diagnostics
    /// only; same never-built discipline as `search`.
    pub async fn sample(&self, limit: usize) -> Result<Vec<Chunk>> {
        {
            let guard = self.cache.read().await;
            if let Some(entries) = guard.as_ref() {
                return Ok(entries.iter().take(limit).cloned().collect());
            }
        }
        let entries = self.load_from_disk().await?;
        let sample = entries.iter().take(limit).cloned().collect();
        *self.cache.write().await = Some(entries);
        Ok(sample)
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    async fn load_from_disk(&self) -> Result<Vec<Chunk>> {
        let path = self.index_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(RagError::IndexUnavailable),
            Err(e) => {
                return Err(store_error(format!("failed to read {}: {e}", path.display())));
            }
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| store_error(format!("corrupt index file {}: {e}", path.display())))
    }
}

fn store_error(message: String) -> RagError {
    RagError::VectorStore { backend: "JsonFile".into(), message }
}

#[async_trait]
impl VectorStore for JsonFileVectorStore {
    async fn rebuild(&self, entries: &[Chunk]) -> Result<()> {
        // Hold the write lock across the swap so in-process readers never
        // race the rename.
        let mut guard = self.cache.write().await;

        let bytes = serde_json::to_vec(entries)
            .map_err(|e| store_error(format!("failed to serialize entries: {e}")))?;

        let staging = self.dir.join(STAGING_FILE);
        tokio::fs::write(&staging, &bytes).await.map_err(|e| {
            store_error(format!("failed to write staging file {}: {e}", staging.display()))
        })?;

        let path = self.index_path();
        tokio::fs::rename(&staging, &path).await.map_err(|e| {
            store_error(format!("failed to activate new generation {}: {e}", path.display()))
        })?;

        *guard = Some(entries.to_vec());
        info!(entries = entries.len(), path = %path.display(), "index generation swapped");
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        {
            let guard = self.cache.read().await;
            if let Some(entries) = guard.as_ref() {
                return Ok(rank(entries, embedding, top_k));
            }
        }
        let entries = self.load_from_disk().await?;
        let results = rank(&entries, embedding, top_k);
        *self.cache.write().await = Some(entries);
        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        {
            let guard = self.cache.read().await;
            if let Some(entries) = guard.as_ref() {
                return Ok(entries.len());
            }
        }
        let entries = self.load_from_disk().await?;
        let count = entries.len();
        *self.cache.write().await = Some(entries);
        Ok(count)
    }
}
