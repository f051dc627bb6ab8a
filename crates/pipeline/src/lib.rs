pub mod artifacts;
pub mod fidelity;
pub mod orchestrator;
pub mod render;

pub use artifacts::{create_dated_folders, dated_folders, list_input_files, OutputLayout};
pub use fidelity::{check_fidelity, FidelityChecker, FidelityOutcome, FidelityReport, Verdict};
pub use orchestrator::{
    chunk_policy, BatchSummary, Orchestrator, PipelineError, ProcessReport,
};
pub use render::{sanitize_text, PandocRenderer, RenderError, Renderer, SkipRenderer};
