use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};
use verbatim_core::config::ChunkingConfig;
use verbatim_core::{word_count, Document};
use verbatim_ingest::{
    chunk_text, is_supported, read_document, ChunkError, ChunkPolicy, ExtractionError, ReadOptions,
};
use verbatim_llm::{FormattedChunk, RateLimiter, WindowFormatter};

use crate::artifacts::{list_input_files, OutputLayout};
use crate::render::{RenderError, Renderer};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("invalid chunking policy: {0}")]
    Chunk(#[from] ChunkError),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot list {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Validate the configured chunking budget.
pub fn chunk_policy(config: &ChunkingConfig) -> Result<ChunkPolicy, PipelineError> {
    Ok(ChunkPolicy::new(config.max_words, config.overlap_words)?)
}

/// What happened to one document.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub source: PathBuf,
    pub chunk_count: usize,
    /// Chunks whose generation call failed and contributed no text.
    pub missing_chunks: usize,
    pub intermediate_path: PathBuf,
    /// `None` when rendering failed or is disabled.
    pub rendered_path: Option<PathBuf>,
    pub output_word_count: usize,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: Vec<ProcessReport>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Documents written with at least one missing chunk.
    pub fn degraded(&self) -> usize {
        self.processed
            .iter()
            .filter(|r| r.missing_chunks > 0)
            .count()
    }
}

/// Join formatted windows in ordinal order, one newline between windows.
/// Missing windows still contribute their (empty) slot.
pub(crate) fn join_formatted(chunks: &[FormattedChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drives documents through chunk → format → join → persist → render.
///
/// Everything runs sequentially: one document at a time, one chunk at a time,
/// with the rate limiter consulted before every generation call.
pub struct Orchestrator {
    formatter: WindowFormatter,
    limiter: Arc<dyn RateLimiter>,
    renderer: Arc<dyn Renderer>,
    policy: ChunkPolicy,
    layout: OutputLayout,
    read_options: ReadOptions,
}

impl Orchestrator {
    pub fn new(
        formatter: WindowFormatter,
        limiter: Arc<dyn RateLimiter>,
        renderer: Arc<dyn Renderer>,
        policy: ChunkPolicy,
        layout: OutputLayout,
    ) -> Self {
        Self {
            formatter,
            limiter,
            renderer,
            policy,
            layout,
            read_options: ReadOptions::default(),
        }
    }

    /// Reader settings used by [`process_file`](Self::process_file).
    pub fn with_read_options(mut self, read_options: ReadOptions) -> Self {
        self.read_options = read_options;
        self
    }

    /// Process one already-read document and persist its artifacts.
    pub async fn process_document(&self, doc: &Document) -> Result<ProcessReport, PipelineError> {
        let source = doc.source_name();
        let sequence = chunk_text(&doc.text, &self.policy);
        info!(
            "Split {} ({} words) into {} chunks",
            source,
            sequence.total_words(),
            sequence.len()
        );

        let mut formatted = Vec::with_capacity(sequence.len());
        for chunk in &sequence {
            self.limiter.acquire().await;
            formatted.push(self.formatter.format(chunk, &source).await);
            info!("Processed chunk {}/{} of {}", chunk.index + 1, sequence.len(), source);
        }

        let missing_chunks = formatted.iter().filter(|c| c.is_missing()).count();
        if missing_chunks > 0 {
            warn!(
                source = %source,
                missing = missing_chunks,
                "document has chunks with no generated text"
            );
        }

        let processed = join_formatted(&formatted);
        drop(formatted);

        let intermediate_path = self.layout.intermediate_path(&doc.source);
        self.write_intermediate(&intermediate_path, &processed).await?;
        info!("Wrote {}", intermediate_path.display());

        let rendered = self.layout.rendered_path(&doc.source);
        let rendered_path = match self.renderer.render(&processed, &rendered).await {
            Ok(()) => {
                info!("Rendered {}", rendered.display());
                Some(rendered)
            }
            Err(RenderError::Disabled) => None,
            Err(e) => {
                error!(source = %source, error = %e, "render failed; intermediate artifact kept");
                None
            }
        };

        Ok(ProcessReport {
            source: doc.source.clone(),
            chunk_count: sequence.len(),
            missing_chunks,
            intermediate_path,
            rendered_path,
            output_word_count: word_count(&processed),
        })
    }

    /// Read a source file and process it.
    pub async fn process_file(&self, path: &Path) -> Result<ProcessReport, PipelineError> {
        info!("Processing {}", path.display());
        let doc = read_document(path, &self.read_options)?;
        let report = self.process_document(&doc).await?;
        info!("Completed processing {}", path.display());
        Ok(report)
    }

    /// Process every file directly inside `input_dir`, in name order.
    ///
    /// A failing file is logged and recorded; the batch always continues.
    pub async fn run(&self, input_dir: &Path) -> BatchSummary {
        let mut summary = BatchSummary::default();

        let files = match list_input_files(input_dir) {
            Ok(files) => files,
            Err(e) => {
                error!("{}", e);
                summary.failed.push((input_dir.to_path_buf(), e.to_string()));
                return summary;
            }
        };
        info!("Found {} files in {}", files.len(), input_dir.display());

        for path in files {
            if !is_supported(&path) {
                let err = PipelineError::from(ExtractionError::UnsupportedType(
                    path.display().to_string(),
                ));
                error!("Skipping {}: {}", path.display(), err);
                summary.failed.push((path, err.to_string()));
                continue;
            }
            match self.process_file(&path).await {
                Ok(report) => summary.processed.push(report),
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    summary.failed.push((path, e.to_string()));
                }
            }
        }

        info!(
            processed = summary.processed.len(),
            failed = summary.failed.len(),
            degraded = summary.degraded(),
            "batch complete"
        );
        summary
    }

    async fn write_intermediate(&self, path: &Path, text: &str) -> Result<(), PipelineError> {
        let io_err = |source: std::io::Error| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::create_dir_all(&self.layout.output_dir)
            .await
            .map_err(|source| PipelineError::Io {
                path: self.layout.output_dir.clone(),
                source,
            })?;
        tokio::fs::write(path, text).await.map_err(io_err)
    }
}
