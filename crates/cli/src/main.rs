mod cli;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use verbatim_core::config::load_dotenv;
use verbatim_core::Config;
use verbatim_ingest::{chunk_text, read_document, ReadOptions};
use verbatim_llm::{create_provider, FixedDelay, RateLimiter, Unlimited, WindowFormatter};
use verbatim_pipeline::{
    chunk_policy, create_dated_folders, BatchSummary, FidelityChecker, FidelityOutcome,
    Orchestrator, OutputLayout, PandocRenderer, Renderer, SkipRenderer,
};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    load_dotenv();
    let mut config = match &args.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    args.apply_overrides(&mut config);

    match args.command {
        Command::Run {
            input,
            output,
            skip_check,
        } => {
            let (input, output) = resolve_dirs(&config, input, output)?;
            logging::init(Some(&output))?;
            log_folders(&input, &output);
            config.log_summary();

            let orchestrator = build_orchestrator(&config, &output)?;
            let summary = orchestrator.run(&input).await;
            report_batch(&summary);

            if !skip_check {
                run_fidelity_check(&config, &input, &output)?;
            }
        }
        Command::Process { file, output } => {
            let output = match output.or_else(|| config.paths.output_dir.clone()) {
                Some(dir) => dir,
                None => create_dated_folders(&config.paths.save_path)?.1,
            };
            logging::init(Some(&output))?;
            info!("Using output folder {}", output.display());
            config.log_summary();

            let orchestrator = build_orchestrator(&config, &output)?;
            let report = orchestrator
                .process_file(&file)
                .await
                .with_context(|| format!("failed to process {}", file.display()))?;
            info!(
                chunks = report.chunk_count,
                missing = report.missing_chunks,
                words = report.output_word_count,
                "Wrote {}",
                report.intermediate_path.display()
            );
        }
        Command::Check { input, output } => {
            let (input, output) = resolve_dirs(&config, input, output)?;
            logging::init(None)?;
            log_folders(&input, &output);
            run_fidelity_check(&config, &input, &output)?;
        }
        Command::Chunk { file } => {
            logging::init(None)?;
            print_chunk_plan(&config, &file)?;
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
        }
    }

    Ok(())
}

/// Explicit flags win, then INPUT_DIR/OUTPUT_DIR, then today's dated folders.
fn resolve_dirs(
    config: &Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf)> {
    let input = input.or_else(|| config.paths.input_dir.clone());
    let output = output.or_else(|| config.paths.output_dir.clone());
    match (input, output) {
        (Some(input), Some(output)) => Ok((input, output)),
        (input, output) => {
            let (dated_input, dated_output) = create_dated_folders(&config.paths.save_path)
                .context("failed to create dated run folders")?;
            Ok((
                input.unwrap_or(dated_input),
                output.unwrap_or(dated_output),
            ))
        }
    }
}

fn log_folders(input: &Path, output: &Path) {
    info!(
        "Using input folder {} and output folder {}",
        input.display(),
        output.display()
    );
}

fn read_options(config: &Config) -> ReadOptions {
    ReadOptions::new(config.render.pandoc_bin.clone())
}

fn build_orchestrator(config: &Config, output: &Path) -> Result<Orchestrator> {
    let policy = chunk_policy(&config.chunking)?;
    let provider = create_provider(&config.llm).context("failed to create LLM provider")?;
    info!("Using {} ({})", config.llm.provider, provider.name());

    let formatter = WindowFormatter::new(
        provider,
        config.llm.temperature,
        config.llm.max_output_tokens,
    );
    let limiter: Arc<dyn RateLimiter> = if config.pipeline.call_delay_ms == 0 {
        Arc::new(Unlimited)
    } else {
        Arc::new(FixedDelay::from_millis(config.pipeline.call_delay_ms))
    };
    let renderer: Arc<dyn Renderer> = if config.render.enabled {
        Arc::new(PandocRenderer::new(
            config.render.pandoc_bin.clone(),
            config.render.template.clone(),
        ))
    } else {
        Arc::new(SkipRenderer)
    };

    Ok(Orchestrator::new(
        formatter,
        limiter,
        renderer,
        policy,
        OutputLayout::new(output, &config.pipeline.intermediate_extension),
    )
    .with_read_options(read_options(config)))
}

fn report_batch(summary: &BatchSummary) {
    info!(
        "Processed {}/{} documents ({} with missing chunks)",
        summary.processed.len(),
        summary.total(),
        summary.degraded()
    );
    for (path, reason) in &summary.failed {
        warn!("Not processed: {} ({})", path.display(), reason);
    }
}

fn run_fidelity_check(config: &Config, input: &Path, output: &Path) -> Result<()> {
    let checker = FidelityChecker::new(
        chunk_policy(&config.chunking)?,
        OutputLayout::new(output, &config.pipeline.intermediate_extension),
    )
    .with_read_options(read_options(config));
    let outcomes = checker.run(input);
    let failed = outcomes
        .iter()
        .filter(|(_, o)| !matches!(o, FidelityOutcome::Checked(r) if r.passed()))
        .count();
    if failed > 0 {
        warn!("{} of {} documents need review", failed, outcomes.len());
    }
    Ok(())
}

fn print_chunk_plan(config: &Config, file: &Path) -> Result<()> {
    let policy = chunk_policy(&config.chunking)?;
    let doc = read_document(file, &read_options(config))
        .with_context(|| format!("failed to read {}", file.display()))?;
    let sequence = chunk_text(&doc.text, &policy);

    println!(
        "{}: {} words, {} chunks (max_words={}, overlap_words={})",
        doc.source_name(),
        sequence.total_words(),
        sequence.len(),
        policy.max_words(),
        policy.overlap_words()
    );
    for chunk in &sequence {
        println!(
            "  #{:<3} words {:>7}..{:<7} ({:>5} words) {:?}",
            chunk.index,
            chunk.start_word,
            chunk.end_word,
            chunk.word_count(),
            chunk.position()
        );
    }
    println!(
        "expected output lower bound: {} words",
        sequence.expected_word_count()
    );
    Ok(())
}
