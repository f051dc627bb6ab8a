//! The sliding word-window algorithm.

use tracing::debug;

use super::types::{Chunk, ChunkPolicy, ChunkSequence};

/// Upper bound on the number of windows for `total_words` words.
pub fn estimate_chunks(total_words: usize, policy: &ChunkPolicy) -> usize {
    if total_words <= policy.max_words() {
        return usize::from(total_words > 0);
    }
    1 + (total_words - policy.max_words()).div_ceil(policy.step())
}

/// Split a word sequence into overlapping windows.
///
/// The cursor starts at 0; each window spans `[start, min(start + max, n))`.
/// Once a window reaches the last word the walk stops, otherwise the next
/// window starts `overlap` words before the current end. An empty input
/// yields an empty sequence.
pub fn chunk_words(words: &[&str], policy: &ChunkPolicy) -> ChunkSequence {
    let total = words.len();
    let mut chunks = Vec::with_capacity(estimate_chunks(total, policy));
    let mut start = 0;

    while start < total {
        let end = (start + policy.max_words()).min(total);
        chunks.push(Chunk {
            index: chunks.len(),
            text: words[start..end].join(" "),
            start_word: start,
            end_word: end,
            is_first: start == 0,
            is_last: end == total,
        });
        if end == total {
            break;
        }
        start = end - policy.overlap_words();
    }

    debug!(
        total_words = total,
        chunks = chunks.len(),
        max_words = policy.max_words(),
        overlap_words = policy.overlap_words(),
        "chunked word sequence"
    );

    ChunkSequence {
        policy: *policy,
        total_words: total,
        chunks,
    }
}

/// Whitespace-split `text` and chunk the resulting words.
pub fn chunk_text(text: &str, policy: &ChunkPolicy) -> ChunkSequence {
    let words: Vec<&str> = text.split_whitespace().collect();
    chunk_words(&words, policy)
}
