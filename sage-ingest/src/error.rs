//! Error types for document loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading source documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data directory does not exist.
    #[error("data directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The directory was scanned but no supported file could be loaded.
    ///
    /// Raised both when no file has a recognized extension and when every
    /// recognized file failed to load.
    #[error("no supported files (.pdf, .docx, .txt) could be loaded from {0}")]
    NoSupportedFiles(PathBuf),

    /// A filesystem read failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file or directory that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// PDF text extraction failed.
    #[error("pdf extraction failed for {path}: {message}")]
    Pdf {
        /// The PDF file.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// DOCX text extraction failed.
    #[error("docx extraction failed for {path}: {message}")]
    Docx {
        /// The DOCX file.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },
}
