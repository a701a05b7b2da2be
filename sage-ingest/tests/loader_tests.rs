//! Directory-scan behavior tests with filesystem fixtures.

use sage_ingest::{LoadError, load_documents};
use tempfile::TempDir;

#[test]
fn missing_directory_is_reported_as_such() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = load_documents(&missing).unwrap_err();
    assert!(matches!(err, LoadError::DirectoryNotFound(_)));
}

#[test]
fn directory_with_only_unsupported_files_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("slides.pptx"), b"not supported").unwrap();
    std::fs::write(dir.path().join("notes.md"), b"# also not supported").unwrap();

    let err = load_documents(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::NoSupportedFiles(_)));
}

#[test]
fn text_files_load_as_single_unpaged_documents() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "stacks are LIFO").unwrap();

    let documents = load_documents(dir.path()).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].source, "notes.txt");
    assert_eq!(documents[0].page, None);
    assert_eq!(documents[0].text, "stacks are LIFO");
}

#[test]
fn a_corrupt_pdf_is_skipped_and_the_valid_file_still_loads() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.pdf"), b"this is not a pdf at all").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "queues are FIFO").unwrap();

    let documents = load_documents(dir.path()).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].source, "notes.txt");
}

#[test]
fn every_file_failing_counts_as_no_supported_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.pdf"), b"garbage").unwrap();
    std::fs::write(dir.path().join("also-broken.docx"), b"more garbage").unwrap();

    let err = load_documents(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::NoSupportedFiles(_)));
}

#[test]
fn files_load_in_name_order_for_deterministic_builds() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.txt"), "second").unwrap();
    std::fs::write(dir.path().join("a.txt"), "first").unwrap();
    std::fs::write(dir.path().join("c.txt"), "third").unwrap();

    let documents = load_documents(dir.path()).unwrap();
    let sources: Vec<_> = documents.iter().map(|d| d.source.as_str()).collect();
    assert_eq!(sources, ["a.txt", "b.txt", "c.txt"]);
}

#[test]
fn extension_matching_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("NOTES.TXT"), "uppercase extension").unwrap();

    let documents = load_documents(dir.path()).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text, "uppercase extension");
}
