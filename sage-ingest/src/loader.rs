//! Directory scanning and file-type dispatch.

use std::path::Path;

use sage_rag::Document;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::{docx, pdf, text};

/// Load all supported documents from `dir`.
///
/// Files are visited in name order so repeated runs over the same
/// directory produce the same document sequence. Unrecognized extensions
/// are skipped silently (with a debug diagnostic); a file that fails to
/// load is skipped with a warning and the scan continues.
///
/// # Errors
///
/// - [`LoadError::DirectoryNotFound`] if `dir` does not exist.
/// - [`LoadError::NoSupportedFiles`] if not a single file loaded
///   successfully.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| LoadError::Io { path: dir.to_path_buf(), source: e })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    let mut loaded_files = 0usize;

    for path in paths {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let result = match extension.as_str() {
            "pdf" => pdf::load(&path),
            "docx" => docx::load(&path),
            "txt" => text::load(&path),
            _ => {
                debug!(file = %path.display(), "skipping unsupported file");
                continue;
            }
        };

        match result {
            Ok(docs) => {
                info!(file = %path.display(), parts = docs.len(), "loaded document");
                documents.extend(docs);
                loaded_files += 1;
            }
            Err(e) => {
                // A single corrupt file must not abort the build; the
                // operator sees the skip and can fix the file later.
                warn!(file = %path.display(), error = %e, "skipping unreadable file");
            }
        }
    }

    if loaded_files == 0 {
        return Err(LoadError::NoSupportedFiles(dir.to_path_buf()));
    }

    info!(files = loaded_files, documents = documents.len(), "directory scan complete");
    Ok(documents)
}

/// The file name used as the document's `source`, for citation.
pub(crate) fn source_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| {
        path.display().to_string()
    })
}
