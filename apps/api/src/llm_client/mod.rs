/// LLM client: the single point of entry for all model calls in PitchSense.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// Everything goes through `LlmRouter`, which picks a backend per task type and
/// applies the same text-hygiene pass to every response.
use async_trait::async_trait;
use thiserror::Error;

pub mod anthropic;
pub mod openai;
pub mod prompts;
pub mod router;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;
pub use router::{LlmRouter, TaskType};

/// Outbound HTTP timeout shared by both backends.
pub(crate) const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM output rejected: {0}")]
    InvalidOutput(String),
}

/// A hosted completion provider. Both backends are interchangeable behind this trait.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;

    fn name(&self) -> &'static str;
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = if let Some(stripped) = text.strip_prefix("```json") {
        stripped
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
    } else {
        return text;
    };
    inner
        .trim_start()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(inner.trim())
}

/// Collapses consecutive duplicate lines and blank-line runs, and drops trailing blanks.
///
/// Duplicates are compared on trimmed content against the previous non-blank line.
pub fn dedupe_lines(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut prev_content: Option<&str> = None;
    let mut blank_run = 0usize;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run <= 1 {
                kept.push(line);
            }
            continue;
        }
        blank_run = 0;

        if prev_content == Some(trimmed) {
            continue;
        }
        kept.push(line);
        prev_content = Some(trimmed);
    }

    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }

    kept.join("\n")
}
