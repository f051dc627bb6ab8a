//! Post-hoc completeness check: does each processed document hold at least
//! as many words as the chunk windows that were sent out?
//!
//! This is a lower bound on word count, not a content comparison. It catches
//! dropped or truncated windows; it cannot catch reordering or paraphrase.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use verbatim_core::word_count;
use verbatim_ingest::{chunk_text, is_supported, read_document, ChunkPolicy, ReadOptions};

use crate::artifacts::{list_input_files, OutputLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FidelityReport {
    /// Sum of word counts over the recomputed chunk windows.
    pub expected_word_count: usize,
    pub output_word_count: usize,
    pub verdict: Verdict,
}

impl FidelityReport {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Words missing from the output; zero when the check passed.
    pub fn shortfall(&self) -> usize {
        self.expected_word_count.saturating_sub(self.output_word_count)
    }
}

/// Recompute the chunk windows of `original` under `policy` and hold
/// `processed` to their total word count.
pub fn check_fidelity(original: &str, processed: &str, policy: &ChunkPolicy) -> FidelityReport {
    let expected_word_count = chunk_text(original, policy).expected_word_count();
    let output_word_count = word_count(processed);
    let verdict = if output_word_count >= expected_word_count {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    FidelityReport {
        expected_word_count,
        output_word_count,
        verdict,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FidelityOutcome {
    Checked(FidelityReport),
    /// No intermediate artifact exists for this input.
    MissingOutput(PathBuf),
    Unreadable(String),
}

/// Runs [`check_fidelity`] over inputs and their persisted artifacts.
pub struct FidelityChecker {
    policy: ChunkPolicy,
    layout: OutputLayout,
    read_options: ReadOptions,
}

impl FidelityChecker {
    pub fn new(policy: ChunkPolicy, layout: OutputLayout) -> Self {
        Self {
            policy,
            layout,
            read_options: ReadOptions::default(),
        }
    }

    /// Reader settings used when re-reading inputs.
    pub fn with_read_options(mut self, read_options: ReadOptions) -> Self {
        self.read_options = read_options;
        self
    }

    pub fn check_file(&self, input: &Path) -> FidelityOutcome {
        let output = self.layout.intermediate_path(input);
        let output_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !output.is_file() {
            warn!(
                "Output file {} does not exist for input file {}",
                output_name,
                input.display()
            );
            return FidelityOutcome::MissingOutput(output);
        }

        let original = match read_document(input, &self.read_options) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Cannot re-read {}: {}", input.display(), e);
                return FidelityOutcome::Unreadable(e.to_string());
            }
        };
        let processed = match std::fs::read_to_string(&output) {
            Ok(text) => text,
            Err(e) => {
                warn!("Cannot read {}: {}", output.display(), e);
                return FidelityOutcome::Unreadable(format!("{}: {}", output.display(), e));
            }
        };

        let report = check_fidelity(&original.text, &processed, &self.policy);
        if report.passed() {
            info!("Document {} passed.", output_name);
        } else {
            warn!(
                expected = report.expected_word_count,
                actual = report.output_word_count,
                "Document {} did not pass. Output has fewer words than expected. \
                 (Expected at least {}, got {})",
                output_name,
                report.expected_word_count,
                report.output_word_count
            );
        }
        FidelityOutcome::Checked(report)
    }

    /// Check every supported input directly inside `input_dir`.
    pub fn run(&self, input_dir: &Path) -> Vec<(PathBuf, FidelityOutcome)> {
        let files = match list_input_files(input_dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("Fidelity check skipped: {}", e);
                return Vec::new();
            }
        };

        let mut outcomes = Vec::new();
        for path in files {
            if !is_supported(&path) {
                debug!("Not checking unsupported file {}", path.display());
                continue;
            }
            let outcome = self.check_file(&path);
            outcomes.push((path, outcome));
        }

        let passed = outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FidelityOutcome::Checked(r) if r.passed()))
            .count();
        info!(
            checked = outcomes.len(),
            passed,
            "fidelity check complete"
        );
        outcomes
    }
}
