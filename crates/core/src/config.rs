use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub paths: PathsConfig,
    pub chunking: ChunkingConfig,
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `VERBATIM_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("VERBATIM_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            paths: PathsConfig::from_env_profiled(p),
            chunking: ChunkingConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            pipeline: PipelineConfig::from_env_profiled(p),
            render: RenderConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  paths:     save_path={}", self.paths.save_path.display());
        tracing::info!(
            "  chunking:  max_words={}, overlap_words={}",
            self.chunking.max_words,
            self.chunking.overlap_words
        );
        tracing::info!(
            "  llm:       provider={}, model={}, configured={}",
            self.llm.provider,
            self.llm.model(),
            self.llm.is_configured()
        );
        tracing::info!(
            "  pipeline:  call_delay_ms={}, intermediate=.{}",
            self.pipeline.call_delay_ms,
            self.pipeline.intermediate_extension
        );
        tracing::info!(
            "  render:    enabled={}, pandoc={}",
            self.render.enabled,
            self.render.pandoc_bin
        );
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "paths": {
                "save_path": self.paths.save_path,
                "input_dir": self.paths.input_dir,
                "output_dir": self.paths.output_dir,
            },
            "chunking": {
                "max_words": self.chunking.max_words,
                "overlap_words": self.chunking.overlap_words,
            },
            "llm": {
                "provider": self.llm.provider,
                "model": self.llm.model(),
                "temperature": self.llm.temperature,
                "max_output_tokens": self.llm.max_output_tokens,
                "configured": self.llm.is_configured(),
            },
            "pipeline": {
                "call_delay_ms": self.pipeline.call_delay_ms,
                "intermediate_extension": self.pipeline.intermediate_extension,
            },
            "render": {
                "enabled": self.render.enabled,
                "pandoc_bin": self.render.pandoc_bin,
                "template": self.render.template,
            },
        })
    }
}

// ── Paths ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory under which dated input/output folders are created.
    pub save_path: PathBuf,
    /// Explicit input directory; overrides the dated folder.
    pub input_dir: Option<PathBuf>,
    /// Explicit output directory; overrides the dated folder.
    pub output_dir: Option<PathBuf>,
}

impl PathsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            save_path: PathBuf::from(profiled_env_or(p, "SAVE_PATH", "data")),
            input_dir: profiled_env_opt(p, "INPUT_DIR").map(PathBuf::from),
            output_dir: profiled_env_opt(p, "OUTPUT_DIR").map(PathBuf::from),
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub max_words: usize,
    pub overlap_words: usize,
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_words: profiled_env_parse(p, "CHUNK_MAX_WORDS", 8000),
            overlap_words: profiled_env_parse(p, "CHUNK_OVERLAP_WORDS", 20),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: 8000,
            overlap_words: 20,
        }
    }
}

// ── LLM (Gemini / Ollama) ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "ollama"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "gemini").to_lowercase(),
            gemini_api_key: profiled_env_opt(p, "GEMINI_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_base_url: profiled_env_or(
                p,
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            ollama_url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            ollama_model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE", 0.1),
            max_output_tokens: profiled_env_parse(p, "LLM_MAX_OUTPUT_TOKENS", 8192),
        }
    }

    /// Model name for the active provider.
    pub fn model(&self) -> &str {
        match self.provider.as_str() {
            "ollama" => &self.ollama_model,
            _ => &self.gemini_model,
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" | "google" => self.gemini_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Pipeline scheduling ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pause between successive generation calls, in milliseconds.
    pub call_delay_ms: u64,
    /// Extension of the intermediate text artifact (without the dot).
    pub intermediate_extension: String,
}

impl PipelineConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            call_delay_ms: profiled_env_parse(p, "LLM_CALL_DELAY_MS", 2000),
            intermediate_extension: profiled_env_or(p, "INTERMEDIATE_EXTENSION", "md")
                .trim_start_matches('.')
                .to_string(),
        }
    }
}

// ── Rendering (pandoc) ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub enabled: bool,
    pub pandoc_bin: String,
    /// Optional LaTeX template passed as `--template`.
    pub template: Option<PathBuf>,
}

impl RenderConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            enabled: profiled_env_bool(p, "RENDER_PDF", true),
            pandoc_bin: profiled_env_or(p, "PANDOC_BIN", "pandoc"),
            template: profiled_env_opt(p, "PANDOC_TEMPLATE").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so each test uses keys under its own profile.

    #[test]
    fn defaults_when_unset() {
        let config = Config::for_profile("ZZ_DEFAULTS_UNSET");
        assert_eq!(config.chunking.max_words, 8000);
        assert_eq!(config.chunking.overlap_words, 20);
        assert_eq!(config.pipeline.intermediate_extension, "md");
        assert_eq!(config.llm.max_output_tokens, 8192);
    }

    #[test]
    fn profiled_key_wins_over_plain_key() {
        env::set_var("ZZ_PROFILED_CHUNK_MAX_WORDS", "1200");
        let config = Config::for_profile("zz_profiled");
        assert_eq!(config.profile, "ZZ_PROFILED");
        assert_eq!(config.chunking.max_words, 1200);
        env::remove_var("ZZ_PROFILED_CHUNK_MAX_WORDS");
    }

    #[test]
    fn unparseable_number_falls_back() {
        env::set_var("ZZ_BADNUM_LLM_CALL_DELAY_MS", "soon");
        let config = Config::for_profile("ZZ_BADNUM");
        assert_eq!(config.pipeline.call_delay_ms, 2000);
        env::remove_var("ZZ_BADNUM_LLM_CALL_DELAY_MS");
    }

    #[test]
    fn extension_loses_leading_dot() {
        env::set_var("ZZ_EXT_INTERMEDIATE_EXTENSION", ".txt");
        let config = Config::for_profile("ZZ_EXT");
        assert_eq!(config.pipeline.intermediate_extension, "txt");
        env::remove_var("ZZ_EXT_INTERMEDIATE_EXTENSION");
    }

    #[test]
    fn render_flag_parsing() {
        env::set_var("ZZ_RENDER_RENDER_PDF", "false");
        assert!(!Config::for_profile("ZZ_RENDER").render.enabled);
        env::set_var("ZZ_RENDER_RENDER_PDF", "yes");
        assert!(Config::for_profile("ZZ_RENDER").render.enabled);
        env::remove_var("ZZ_RENDER_RENDER_PDF");
    }

    #[test]
    fn ollama_needs_no_key() {
        let llm = LlmConfig {
            provider: "ollama".into(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".into(),
            gemini_base_url: String::new(),
            ollama_url: "http://localhost:11434".into(),
            ollama_model: "llama3.2".into(),
            temperature: 0.1,
            max_output_tokens: 8192,
        };
        assert!(llm.is_configured());
        assert_eq!(llm.model(), "llama3.2");
    }

    #[test]
    fn redacted_summary_has_no_key() {
        env::set_var("ZZ_REDACT_GEMINI_API_KEY", "secret-key-value");
        let config = Config::for_profile("ZZ_REDACT");
        let summary = config.redacted_summary().to_string();
        assert!(!summary.contains("secret-key-value"));
        assert!(summary.contains("\"configured\":true"));
        env::remove_var("ZZ_REDACT_GEMINI_API_KEY");
    }
}
