//! Window Formatter: one generation call per chunk.
//!
//! A failed call never propagates. The chunk comes back as an empty
//! [`FormattedChunk`] and the gap shows up later as a word-count shortfall
//! in the fidelity check.

use std::sync::Arc;

use tracing::{debug, error, info};
use verbatim_ingest::Chunk;

use crate::provider::{LlmProvider, Message};

/// Fixed style instruction sent with every call.
pub const SYSTEM_PROMPT: &str = "\
You are a TA for an MIT professor. Be accurate. Your task is to clean up transcripts of interviews for analysis.

IMPORTANT INSTRUCTIONS:
1. Do not summarize--return verbatim full text of what the speaker says.
2. Break text into segments organized around topics.
3. Include a descriptive title for each section.
4. Within each speaker's chunk, be sure to break text up into shorter paragraphs (2-5 sentences) for improved readability.
5. Indicate who is speaking.

FORMATTING:
- Use '#' before each section title to make it a header.
- Start a new line for each speaker change.
- When introducing a speaker, bold their name with '**' surrounding it.
- Use very short paragraphs, even if it means breaking up a speaker's continuous dialogue.

EXAMPLE FORMAT:
# Introduction to the Project

**Interviewer**: Can you tell us about the project?

**Interviewee**: Certainly. The project began last year.

Remember, accuracy and readability are key. Do not alter the original content, just improve its organization and presentation.
";

/// Per-call instruction: where this window sits in the transcript, followed
/// by the window's raw text.
pub fn window_context(chunk: &Chunk) -> String {
    let opening = if chunk.is_first {
        "This is the beginning of the transcript."
    } else {
        "This is a continuation of the transcript."
    };
    let closing = if chunk.is_last {
        "This is the end of the transcript."
    } else {
        "The transcript continues after this chunk."
    };

    format!(
        "ADDITIONAL INSTRUCTIONS:\n{opening}\n{closing}\n\
         Ensure your formatting is consistent with previous and following chunks.\n\n\
         Here is the transcript chunk:\n{}\n",
        chunk.text
    )
}

/// Service output for one chunk. Empty text means the window's content is
/// missing from the processed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedChunk {
    pub index: usize,
    pub text: String,
}

impl FormattedChunk {
    pub fn missing(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct WindowFormatter {
    provider: Arc<dyn LlmProvider>,
    system_prompt: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl WindowFormatter {
    pub fn new(provider: Arc<dyn LlmProvider>, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            provider,
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature,
            max_output_tokens,
        }
    }

    /// Replace the default style instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Format one chunk. `source` only labels log lines.
    pub async fn format(&self, chunk: &Chunk, source: &str) -> FormattedChunk {
        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(window_context(chunk)),
        ];

        debug!(
            source,
            chunk = chunk.index,
            position = ?chunk.position(),
            words = chunk.word_count(),
            "sending chunk to {}",
            self.provider.name()
        );

        match self
            .provider
            .complete(messages, self.temperature, self.max_output_tokens)
            .await
        {
            Ok(response) => {
                let text = response.trim();
                if text.is_empty() {
                    error!(source, chunk = chunk.index, "generation returned empty text");
                    return FormattedChunk::missing(chunk.index);
                }
                info!(
                    source,
                    chunk = chunk.index,
                    chars = text.len(),
                    "chunk formatted"
                );
                debug!(source, chunk = chunk.index, response = %text, "raw response");
                FormattedChunk {
                    index: chunk.index,
                    text: text.to_string(),
                }
            }
            Err(e) => {
                error!(source, chunk = chunk.index, error = %e, "generation failed");
                FormattedChunk::missing(chunk.index)
            }
        }
    }
}
