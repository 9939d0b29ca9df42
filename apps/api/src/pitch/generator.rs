//! Pitch generation: orchestrates the full generation pipeline.
//!
//! Flow: validate profile → build prompt → LLM (strict JSON, one corrective
//!       re-prompt) → canonicalize + grade → persist startup and deck →
//!       clarifying questions for weak sections → return response.
//!
//! There is no fallback pitch: an LLM failure here is returned to the caller.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::SPECIFICITY_INSTRUCTION;
use crate::llm_client::{LlmRouter, TaskType};
use crate::models::startup::{StartupProfile, StartupRecord};
use crate::pitch::analyzer::{analyze_pitch, overall_confidence, Pitch, RawSection};
use crate::pitch::clarifier::{clarifying_questions, record_questions, SectionQuestions};
use crate::pitch::deck::save_next_version;
use crate::pitch::prompts::{GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM};
use crate::pitch::sections::SectionKey;
use crate::store::{self, RecordStore, STARTUPS};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Optional investor the pitch should be tailored for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorTarget {
    pub name: String,
    #[serde(default)]
    pub focus: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePitchRequest {
    pub profile: StartupProfile,
    #[serde(default)]
    pub investor: Option<InvestorTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratePitchResponse {
    pub startup_id: Uuid,
    pub pitch_id: Uuid,
    pub version: u32,
    pub overall_confidence: f64,
    pub pitch: Pitch,
    pub clarifying_questions: SectionQuestions,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_pitch_deck(
    store: &dyn RecordStore,
    llm: &LlmRouter,
    request: GeneratePitchRequest,
) -> Result<GeneratePitchResponse, AppError> {
    let GeneratePitchRequest { profile, investor } = request;
    profile.validate()?;

    info!("Generating pitch for '{}'", profile.name);
    let pitch = generate_pitch(llm, &profile, investor.as_ref()).await?;
    info!(
        "Pitch for '{}' graded at {:.2} overall",
        profile.name,
        overall_confidence(&pitch)
    );

    let startup_id = Uuid::new_v4();
    let startup = StartupRecord {
        id: startup_id,
        profile: profile.clone(),
        created_at: Utc::now(),
    };
    store::save(store, STARTUPS, &startup_id.to_string(), &startup).await?;

    let deck = save_next_version(store, startup_id, pitch, profile.user_inputs()).await?;

    let questions = clarifying_questions(llm, &deck.pitch).await;
    record_questions(store, &deck, &questions).await?;

    Ok(GeneratePitchResponse {
        startup_id,
        pitch_id: deck.id,
        version: deck.version,
        overall_confidence: overall_confidence(&deck.pitch),
        pitch: deck.pitch,
        clarifying_questions: questions,
    })
}

/// One LLM round trip (plus at most one corrective re-prompt), then grading.
pub async fn generate_pitch(
    llm: &LlmRouter,
    profile: &StartupProfile,
    investor: Option<&InvestorTarget>,
) -> Result<Pitch, AppError> {
    let prompt = build_generation_prompt(profile, investor);

    let raw: BTreeMap<String, RawSection> = llm
        .complete_json(
            TaskType::PitchGeneration,
            &prompt,
            Some(GENERATION_SYSTEM),
            validate_raw_pitch,
        )
        .await?;

    Ok(analyze_pitch(&raw, &profile.user_inputs())?)
}

fn build_generation_prompt(profile: &StartupProfile, investor: Option<&InvestorTarget>) -> String {
    let investor_context = match investor {
        Some(target) => {
            let mut context = format!(
                "You are preparing the founder to pitch {}.\nInvestor Name: {}",
                target.name, target.name
            );
            if let Some(focus) = target.focus.as_deref().filter(|f| !f.trim().is_empty()) {
                context.push_str(&format!(", Focus: {focus}"));
            }
            context.push('\n');
            context
        }
        None => String::new(),
    };

    GENERATION_PROMPT_TEMPLATE
        .replace("{investor_context}", &investor_context)
        .replace("{specificity_instruction}", SPECIFICITY_INSTRUCTION)
        .replace("{startup_name}", &profile.name)
        .replace("{industry}", &profile.industry)
        .replace("{product}", &profile.product)
        .replace("{traction}", &profile.traction)
        .replace("{stage}", &profile.stage)
        .replace("{ask}", &profile.ask)
}

/// Every key must canonicalize, all seven sections must be present with text.
fn validate_raw_pitch(raw: &BTreeMap<String, RawSection>) -> Result<(), String> {
    let mut seen = BTreeSet::new();
    for (name, section) in raw {
        let key = SectionKey::canonicalize(name).ok_or_else(|| format!("unexpected key '{name}'"))?;
        if section.text.trim().is_empty() {
            return Err(format!("section '{name}' has empty text"));
        }
        seen.insert(key);
    }

    let missing: Vec<&str> = SectionKey::ALL
        .iter()
        .filter(|k| !seen.contains(*k))
        .map(|k| k.as_str())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing sections: {}", missing.join(", ")))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::startup::StartupProfile;

    pub fn profile() -> StartupProfile {
        StartupProfile {
            name: "Acme".to_string(),
            industry: "Logistics".to_string(),
            stage: "Seed".to_string(),
            product: "route optimizer".to_string(),
            traction: "12 pilot customers".to_string(),
            ask: "$1.5M".to_string(),
            city: "Lagos".to_string(),
            country: "Nigeria".to_string(),
            age_years: 2.0,
            valuation: None,
            existing_investors: vec![],
        }
    }

    /// All seven sections. Problem and market are deliberately weak (< 0.7).
    pub const PITCH_JSON: &str = r#"{
        "problem": {"text": "Many carriers struggle with planning."},
        "solution": {"text": "Acme ships a route optimizer for dispatchers."},
        "market": {"text": "We believe the market is huge."},
        "Business Model": {"text": "Acme charges per truck per month."},
        "Competition & Moat": {"text": "Acme's route optimizer beats spreadsheets for Logistics teams."},
        "traction": {"text": "Acme has 12 pilot customers."},
        "ask": {"text": "Acme is raising $1.5M."}
    }"#;
}
