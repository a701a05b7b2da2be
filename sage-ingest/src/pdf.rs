//! PDF text extraction.

use std::path::Path;

use sage_rag::Document;

use crate::error::LoadError;
use crate::loader::source_name;

/// Load a PDF as one document per page.
///
/// `pdf-extract` returns the whole file as one string with form feed
/// characters (`\x0C`) between pages; pages are numbered from 1 here so
/// citations match what a reader sees in a PDF viewer.
pub(crate) fn load(path: &Path) -> Result<Vec<Document>, LoadError> {
    let bytes = std::fs::read(path)
        .map_err(|e| LoadError::Io { path: path.to_path_buf(), source: e })?;

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| LoadError::Pdf { path: path.to_path_buf(), message: e.to_string() })?;

    let source = source_name(path);
    let documents: Vec<Document> = text
        .split('\u{0C}')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| Document::page(source.clone(), i as u32 + 1, page_text.trim()))
        .collect();

    if documents.is_empty() {
        // Extraction succeeded but found nothing; typically a scanned
        // image PDF, which this loader does not OCR.
        return Err(LoadError::Pdf {
            path: path.to_path_buf(),
            message: "no extractable text (scanned or image-only pdf?)".to_string(),
        });
    }

    Ok(documents)
}
