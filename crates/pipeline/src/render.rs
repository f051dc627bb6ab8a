//! Rendering of the secondary (PDF) artifact.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to run {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("rendering disabled")]
    Disabled,
}

/// Turns the processed markdown into the rendered artifact at `output`.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, markdown: &str, output: &Path) -> Result<(), RenderError>;
}

/// Drop every non-ASCII character. The LaTeX PDF engine rejects many of them.
pub fn sanitize_text(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Renders via an external `pandoc` process.
#[derive(Debug, Clone)]
pub struct PandocRenderer {
    pub pandoc_bin: String,
    pub template: Option<PathBuf>,
}

impl PandocRenderer {
    pub fn new(pandoc_bin: impl Into<String>, template: Option<PathBuf>) -> Self {
        Self {
            pandoc_bin: pandoc_bin.into(),
            template,
        }
    }

    fn args(&self, output: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            "markdown".to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ];
        if let Some(template) = &self.template {
            args.push(format!("--template={}", template.display()));
        }
        args
    }
}

impl Default for PandocRenderer {
    fn default() -> Self {
        Self::new("pandoc", None)
    }
}

#[async_trait]
impl Renderer for PandocRenderer {
    async fn render(&self, markdown: &str, output: &Path) -> Result<(), RenderError> {
        let spawn_err = |source: std::io::Error| RenderError::Spawn {
            bin: self.pandoc_bin.clone(),
            source,
        };
        let sanitized = sanitize_text(markdown);
        let args = self.args(output);
        debug!("{} {}", self.pandoc_bin, args.join(" "));

        let mut child = Command::new(&self.pandoc_bin)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(sanitized.as_bytes())
                .await
                .map_err(spawn_err)?;
        }

        let out = child.wait_with_output().await.map_err(spawn_err)?;
        if !out.status.success() {
            return Err(RenderError::Failed {
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Renders nothing; used when PDF output is turned off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipRenderer;

#[async_trait]
impl Renderer for SkipRenderer {
    async fn render(&self, _markdown: &str, _output: &Path) -> Result<(), RenderError> {
        Err(RenderError::Disabled)
    }
}
