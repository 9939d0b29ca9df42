//! Section improvement and regeneration.
//!
//! Both rewrite one section via the secondary backend, then re-grade the whole pitch
//! and save it as the next deck version. If the backend fails the deck is left
//! untouched and the response carries a labeled `fallback_reason`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::SPECIFICITY_INSTRUCTION;
use crate::llm_client::{LlmRouter, TaskType};
use crate::pitch::analyzer::{overall_confidence, regrade_pitch, Pitch, PitchSection};
use crate::pitch::deck::{load_deck, save_next_version};
use crate::pitch::prompts::{IMPROVE_PROMPT_TEMPLATE, REGENERATE_PROMPT_TEMPLATE};
use crate::pitch::sections::SectionKey;
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq)]
pub enum SectionEdit {
    /// Fold new founder-supplied information into the section.
    Improve { user_input: String },
    /// Rewrite for specificity without new information.
    Regenerate,
}

impl SectionEdit {
    fn task(&self) -> TaskType {
        match self {
            SectionEdit::Improve { .. } => TaskType::Improve,
            SectionEdit::Regenerate => TaskType::Regenerate,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub user_input: String,
}

#[derive(Debug, Serialize)]
pub struct SectionEditResponse {
    pub startup_id: Uuid,
    pub section: SectionKey,
    pub version: u32,
    pub updated: bool,
    pub previous_text: String,
    pub section_result: PitchSection,
    pub overall_confidence: f64,
    pub pitch: Pitch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Rewrites one section of the stored deck and persists the re-graded pitch.
pub async fn edit_section(
    store: &dyn RecordStore,
    llm: &LlmRouter,
    startup_id: Uuid,
    section: SectionKey,
    edit: SectionEdit,
) -> Result<SectionEditResponse, AppError> {
    if let SectionEdit::Improve { user_input } = &edit {
        if user_input.trim().is_empty() {
            return Err(AppError::Validation("user_input cannot be empty".to_string()));
        }
    }

    let deck = load_deck(store, startup_id).await?;
    let current = deck
        .pitch
        .get(&section)
        .ok_or_else(|| AppError::NotFound(format!("Section '{section}' not in pitch deck")))?
        .clone();

    let rewritten = match rewrite_section(llm, section, &current.text, &edit).await {
        Ok(text) => text,
        Err(reason) => {
            warn!("{:?} of {section} for {startup_id} fell back: {reason}", edit.task());
            return Ok(SectionEditResponse {
                startup_id,
                section,
                version: deck.version,
                updated: false,
                previous_text: current.text.clone(),
                section_result: current,
                overall_confidence: overall_confidence(&deck.pitch),
                pitch: deck.pitch,
                fallback_reason: Some(format!(
                    "Rewrite unavailable, original text kept: {reason}"
                )),
            });
        }
    };

    let mut user_inputs = deck.user_inputs;
    if let SectionEdit::Improve { user_input } = &edit {
        let input = user_input.trim().to_string();
        if !user_inputs.iter().any(|u| u.eq_ignore_ascii_case(&input)) {
            user_inputs.push(input);
        }
    }

    let mut pitch = deck.pitch;
    if let Some(entry) = pitch.get_mut(&section) {
        entry.text = rewritten;
    }
    let pitch = regrade_pitch(&pitch, &user_inputs);

    let saved = save_next_version(store, startup_id, pitch, user_inputs).await?;
    let section_result = saved
        .pitch
        .get(&section)
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("section vanished after regrade")))?;

    info!(
        "{section} for {startup_id}: {:.2} -> {:.2} (deck v{})",
        current.confidence, section_result.confidence, saved.version
    );

    Ok(SectionEditResponse {
        startup_id,
        section,
        version: saved.version,
        updated: true,
        previous_text: current.text,
        section_result,
        overall_confidence: overall_confidence(&saved.pitch),
        pitch: saved.pitch,
        fallback_reason: None,
    })
}

/// Returns the rewritten text, or a human-readable reason it is unavailable.
async fn rewrite_section(
    llm: &LlmRouter,
    section: SectionKey,
    current_text: &str,
    edit: &SectionEdit,
) -> Result<String, String> {
    let prompt = match edit {
        SectionEdit::Improve { user_input } => IMPROVE_PROMPT_TEMPLATE
            .replace("{section_title}", section.title())
            .replace("{current_text}", current_text)
            .replace("{user_input}", user_input.trim())
            .replace("{specificity_instruction}", SPECIFICITY_INSTRUCTION),
        SectionEdit::Regenerate => REGENERATE_PROMPT_TEMPLATE
            .replace("{section_title}", section.title())
            .replace("{current_text}", current_text)
            .replace("{specificity_instruction}", SPECIFICITY_INSTRUCTION),
    };

    let text = llm
        .complete(edit.task(), &prompt, None)
        .await
        .map_err(|e| e.to_string())?;
    let text = strip_wrapping_quotes(text.trim());
    if text.is_empty() {
        return Err("model returned no text".to_string());
    }
    Ok(text.to_string())
}

/// The prompts quote the current text; models sometimes echo the quotes back.
fn strip_wrapping_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(text)
}
