//! Integration tests for reading source files from disk into documents.

use std::path::PathBuf;

use uuid::Uuid;
use verbatim_ingest::{chunk_text, read_document, ChunkPolicy, ExtractionError, ReadOptions};

/// Create a unique temp directory for each test.
fn test_data_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("verbatim-ingest-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn txt_file_round_trips_into_document() {
    let dir = test_data_dir();
    let path = dir.join("interview_01.txt");
    std::fs::write(&path, "Interviewer: Welcome.\n\nGuest: Thanks for having me.").unwrap();

    let doc = read_document(&path, &ReadOptions::default()).unwrap();
    assert_eq!(doc.source, path);
    assert_eq!(doc.source_stem(), "interview_01");
    assert_eq!(doc.word_count(), 7);

    let seq = chunk_text(&doc.text, &ChunkPolicy::default());
    assert_eq!(seq.len(), 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_txt_file_is_a_valid_empty_document() {
    let dir = test_data_dir();
    let path = dir.join("blank.txt");
    std::fs::write(&path, "").unwrap();

    let doc = read_document(&path, &ReadOptions::default()).unwrap();
    assert_eq!(doc.word_count(), 0);
    assert!(chunk_text(&doc.text, &ChunkPolicy::default()).is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unsupported_extension_fails_only_that_file() {
    let dir = test_data_dir();
    let bad = dir.join("notes.md");
    let good = dir.join("notes.txt");
    std::fs::write(&bad, "# heading").unwrap();
    std::fs::write(&good, "plain words").unwrap();

    assert!(matches!(
        read_document(&bad, &ReadOptions::default()),
        Err(ExtractionError::UnsupportedType(_))
    ));
    assert_eq!(read_document(&good, &ReadOptions::default()).unwrap().word_count(), 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn corrupt_docx_is_a_reader_failure() {
    let dir = test_data_dir();
    let path = dir.join("broken.docx");
    std::fs::write(&path, b"PK but not really").unwrap();

    assert!(matches!(
        read_document(&path, &ReadOptions::default()),
        Err(ExtractionError::DocxError(_))
    ));

    std::fs::remove_dir_all(&dir).ok();
}
