use std::path::PathBuf;

use clap::{Parser, Subcommand};
use verbatim_core::Config;

/// Reformat long interview transcripts with an LLM, one window at a time.
///
/// Settings come from the environment (and `.env`); the flags below
/// override them for a single invocation.
#[derive(Parser, Debug)]
#[command(name = "verbatim", version, about = "Chunk, reformat and reassemble transcripts")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Config profile (overrides VERBATIM_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Word budget per chunk window
    #[arg(long, global = true)]
    pub max_words: Option<usize>,

    /// Words repeated between consecutive windows
    #[arg(long, global = true)]
    pub overlap_words: Option<usize>,

    /// Pause between generation calls, in milliseconds
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Skip PDF rendering; only the intermediate artifact is written
    #[arg(long, global = true)]
    pub no_render: bool,

    /// Generation provider: gemini or ollama
    #[arg(long, global = true)]
    pub provider: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process every document in the input folder, then check fidelity
    Run {
        /// Input folder (default: INPUT_DIR or today's dated folder)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output folder (default: OUTPUT_DIR or today's dated folder)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Do not run the fidelity check after the batch
        #[arg(long)]
        skip_check: bool,
    },
    /// Process a single document
    Process {
        file: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare processed outputs against their inputs by word count
    Check {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the chunk plan for a document without calling the service
    Chunk { file: PathBuf },
    /// Print the resolved configuration (secrets redacted)
    Config,
}

impl CliArgs {
    /// Fold command-line overrides into the env-derived config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(max) = self.max_words {
            config.chunking.max_words = max;
        }
        if let Some(overlap) = self.overlap_words {
            config.chunking.overlap_words = overlap;
        }
        if let Some(delay) = self.delay_ms {
            config.pipeline.call_delay_ms = delay;
        }
        if self.no_render {
            config.render.enabled = false;
        }
        if let Some(provider) = &self.provider {
            config.llm.provider = provider.to_lowercase();
        }
    }
}
