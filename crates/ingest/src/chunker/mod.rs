//! Word-window chunking engine.
//!
//! Splits a document's word sequence into ordered, overlapping windows
//! bounded by a word budget. Word counts stand in for the generation
//! service's token limit; there is no sentence or paragraph awareness.

mod types;
mod window;

pub use types::{Chunk, ChunkError, ChunkPolicy, ChunkSequence, WindowPosition};
pub use window::{chunk_text, chunk_words, estimate_chunks};
