//! Plain-text file loading.

use std::path::Path;

use sage_rag::Document;

use crate::error::LoadError;
use crate::loader::source_name;

/// Load a UTF-8 text file as a single unpaged document.
pub(crate) fn load(path: &Path) -> Result<Vec<Document>, LoadError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Io { path: path.to_path_buf(), source: e })?;

    Ok(vec![Document::new(source_name(path), text)])
}
