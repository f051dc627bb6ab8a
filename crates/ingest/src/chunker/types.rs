//! Chunk policy and output types.

use std::ops::Range;

use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The window would never advance: `max_words` must exceed `overlap_words`.
    #[error("invalid chunk policy: max_words ({max_words}) must be greater than overlap_words ({overlap_words})")]
    InvalidPolicy {
        max_words: usize,
        overlap_words: usize,
    },
}

// ── Policy ──────────────────────────────────────────────────────────────────

/// Word budget per window and the number of words repeated between windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPolicy {
    max_words: usize,
    overlap_words: usize,
}

impl ChunkPolicy {
    pub const DEFAULT_MAX_WORDS: usize = 8000;
    pub const DEFAULT_OVERLAP_WORDS: usize = 20;

    /// Validate and build a policy. Rejects any policy whose window cannot
    /// advance (`max_words <= overlap_words`, which includes `max_words == 0`).
    pub fn new(max_words: usize, overlap_words: usize) -> Result<Self, ChunkError> {
        if max_words <= overlap_words {
            return Err(ChunkError::InvalidPolicy {
                max_words,
                overlap_words,
            });
        }
        Ok(Self {
            max_words,
            overlap_words,
        })
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn overlap_words(&self) -> usize {
        self.overlap_words
    }

    /// Minimum cursor advance between consecutive windows. Always >= 1.
    pub fn step(&self) -> usize {
        self.max_words - self.overlap_words
    }
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            max_words: Self::DEFAULT_MAX_WORDS,
            overlap_words: Self::DEFAULT_OVERLAP_WORDS,
        }
    }
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// Where a window sits in its document. Drives the positional note sent to
/// the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// The whole document fits in one window.
    Only,
    First,
    Middle,
    Last,
}

/// One window of a document's words, joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based ordinal within the sequence.
    pub index: usize,
    /// The window's words joined with `' '`.
    pub text: String,
    /// First word index covered (inclusive).
    pub start_word: usize,
    /// Last word index covered (exclusive).
    pub end_word: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl Chunk {
    pub fn word_span(&self) -> Range<usize> {
        self.start_word..self.end_word
    }

    pub fn word_count(&self) -> usize {
        self.end_word - self.start_word
    }

    pub fn position(&self) -> WindowPosition {
        match (self.is_first, self.is_last) {
            (true, true) => WindowPosition::Only,
            (true, false) => WindowPosition::First,
            (false, true) => WindowPosition::Last,
            (false, false) => WindowPosition::Middle,
        }
    }
}

/// Ordered windows covering one document under one policy.
///
/// Built fresh per document and never shared between documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSequence {
    pub(crate) policy: ChunkPolicy,
    pub(crate) total_words: usize,
    pub(crate) chunks: Vec<Chunk>,
}

impl ChunkSequence {
    pub fn policy(&self) -> ChunkPolicy {
        self.policy
    }

    /// Word count of the document the sequence was built from.
    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    pub fn as_slice(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Sum of word counts over all windows, overlap counted once per window.
    /// This is the lower bound the fidelity check holds formatted output to.
    pub fn expected_word_count(&self) -> usize {
        self.chunks.iter().map(Chunk::word_count).sum()
    }
}

impl IntoIterator for ChunkSequence {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChunkSequence {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
