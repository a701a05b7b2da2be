//! DOCX text extraction.
//!
//! A `.docx` file is a zip container; the body text lives in
//! `word/document.xml`. Paragraph closers become line breaks, every other
//! tag is dropped, and the handful of XML entities WordprocessingML uses
//! are decoded. No page provenance: DOCX has no fixed page concept until
//! layout time.

use std::io::Read;
use std::path::Path;

use sage_rag::Document;

use crate::error::LoadError;
use crate::loader::source_name;

pub(crate) fn load(path: &Path) -> Result<Vec<Document>, LoadError> {
    let file = std::fs::File::open(path)
        .map_err(|e| LoadError::Io { path: path.to_path_buf(), source: e })?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| LoadError::Docx { path: path.to_path_buf(), message: e.to_string() })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| LoadError::Docx {
            path: path.to_path_buf(),
            message: format!("missing word/document.xml: {e}"),
        })?
        .read_to_string(&mut xml)
        .map_err(|e| LoadError::Docx { path: path.to_path_buf(), message: e.to_string() })?;

    let text = plaintext_from_document_xml(&xml);
    if text.trim().is_empty() {
        return Err(LoadError::Docx {
            path: path.to_path_buf(),
            message: "document body contains no text".to_string(),
        });
    }

    Ok(vec![Document::new(source_name(path), text)])
}

/// Strip WordprocessingML down to plain text.
fn plaintext_from_document_xml(xml: &str) -> String {
    // Paragraph and line-break closers become newlines before tags are
    // stripped, so paragraph structure survives for the chunker.
    let xml = xml.replace("</w:p>", "\n").replace("<w:br/>", "\n").replace("<w:tab/>", "\t");

    let mut text = String::with_capacity(xml.len() / 4);
    let mut in_tag = false;
    for ch in xml.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    decode_entities(&text).trim().to_string()
}

/// Decode the five predefined XML entities.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_paragraph_text_with_breaks() {
        let xml = r#"<?xml version="1.0"?><w:document><w:body>
            <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
            <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t> paragraph.</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let text = plaintext_from_document_xml(xml);
        assert!(text.contains("First paragraph.\n"));
        assert!(text.contains("Second paragraph."));
    }

    #[test]
    fn decodes_xml_entities() {
        let xml = "<w:p><w:r><w:t>a &amp; b &lt; c</w:t></w:r></w:p>";
        assert_eq!(plaintext_from_document_xml(xml), "a & b < c");
    }

    #[test]
    fn amp_decodes_last_so_double_escapes_stay_literal() {
        let xml = "<w:p><w:t>&amp;lt;</w:t></w:p>";
        assert_eq!(plaintext_from_document_xml(xml), "&lt;");
    }
}
