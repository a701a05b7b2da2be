//! # sage-ingest
//!
//! Filesystem document loading for the sage study assistant.
//!
//! [`load_documents`] scans a directory for supported files (`.pdf`,
//! `.docx`, `.txt`) and turns each into one or more
//! [`Document`](sage_rag::Document)s with source and page provenance.
//! Individual unreadable files are skipped with a diagnostic; the scan
//! only fails when nothing usable is found.

mod docx;
mod error;
mod loader;
mod pdf;
mod text;

pub use error::LoadError;
pub use loader::load_documents;
