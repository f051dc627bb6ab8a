//! Source readers and the word-window chunker.
//!
//! Documents arrive as `.pdf`, `.rtf`, `.docx` or `.txt` files and leave as a
//! [`Document`](verbatim_core::Document) whose words the [`chunker`] splits
//! into overlapping windows sized for the generation service.

pub mod chunker;
pub mod document;

pub use chunker::{
    chunk_text, chunk_words, Chunk, ChunkError, ChunkPolicy, ChunkSequence, WindowPosition,
};
pub use document::{
    extract_text, is_supported, read_document, ExtractedDocument, ExtractionError, ReadOptions,
    SourceFormat,
};
