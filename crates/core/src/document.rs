use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Count words the way every stage of the pipeline counts them: runs of
/// non-whitespace separated by Unicode whitespace.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A source document after extraction: the raw text body plus where it came from.
///
/// Immutable once read; the chunker borrows its words and the document is
/// dropped once the chunk sequence has been built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Path of the file the text was read from.
    pub source: PathBuf,
    /// Extracted text body.
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// The ordered word sequence of the body.
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    /// File name of the source, for log lines.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// File stem of the source; output artifacts are named after it.
    pub fn source_stem(&self) -> String {
        source_stem(&self.source)
    }
}

/// File stem of `path`, falling back to `"untitled"` for paths without one.
pub fn source_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}
