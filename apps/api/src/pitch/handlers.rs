//! Axum route handlers for the Pitch API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pitch::{FeedbackEntry, FeedbackKind, PitchDeckRecord};
use crate::models::startup::StartupRecord;
use crate::pitch::analyzer::{analyze_pitch, overall_confidence, Pitch, RawSection};
use crate::pitch::clarifier::{clarifying_questions, record_questions, SectionQuestions};
use crate::pitch::deck::{load_deck, load_startup};
use crate::pitch::email::{draft_email, EmailDraftResponse, EmailRequest};
use crate::pitch::export::{export_pitch, ExportResponse};
use crate::pitch::generator::{generate_pitch_deck, GeneratePitchRequest, GeneratePitchResponse};
use crate::pitch::improver::{edit_section, ImproveRequest, SectionEdit, SectionEditResponse};
use crate::pitch::sections::SectionKey;
use crate::state::AppState;
use crate::store::{self, FEEDBACK_LOG};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub sections: BTreeMap<String, RawSection>,
    #[serde(default)]
    pub user_inputs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub overall_confidence: f64,
    pub pitch: Pitch,
}

#[derive(Debug, Serialize)]
pub struct PitchDetailResponse {
    pub startup: StartupRecord,
    pub deck: PitchDeckRecord,
    pub overall_confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub startup_id: Uuid,
    pub version: u32,
    pub clarifying_questions: SectionQuestions,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub content: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub pitch_id: Uuid,
    pub recorded: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/pitches
///
/// Generates, grades and stores a pitch deck for a new startup.
pub async fn handle_generate_pitch(
    State(state): State<AppState>,
    Json(request): Json<GeneratePitchRequest>,
) -> Result<(StatusCode, Json<GeneratePitchResponse>), AppError> {
    let response = generate_pitch_deck(state.store.as_ref(), &state.llm, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/pitches/analyze
///
/// Grades caller-supplied sections. No LLM call, nothing stored.
pub async fn handle_analyze(
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.sections.is_empty() {
        return Err(AppError::Validation("sections cannot be empty".to_string()));
    }
    let pitch = analyze_pitch(&request.sections, &request.user_inputs)?;
    Ok(Json(AnalyzeResponse {
        overall_confidence: overall_confidence(&pitch),
        pitch,
    }))
}

/// GET /api/v1/pitches/:startup_id
pub async fn handle_get_pitch(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> Result<Json<PitchDetailResponse>, AppError> {
    let startup = load_startup(state.store.as_ref(), startup_id).await?;
    let deck = load_deck(state.store.as_ref(), startup_id).await?;
    Ok(Json(PitchDetailResponse {
        overall_confidence: overall_confidence(&deck.pitch),
        startup,
        deck,
    }))
}

/// POST /api/v1/pitches/:startup_id/sections/:section/improve
pub async fn handle_improve_section(
    State(state): State<AppState>,
    Path((startup_id, section)): Path<(Uuid, String)>,
    Json(request): Json<ImproveRequest>,
) -> Result<Json<SectionEditResponse>, AppError> {
    let section: SectionKey = section.parse()?;
    let edit = SectionEdit::Improve {
        user_input: request.user_input,
    };
    let response = edit_section(state.store.as_ref(), &state.llm, startup_id, section, edit).await?;
    Ok(Json(response))
}

/// POST /api/v1/pitches/:startup_id/sections/:section/regenerate
pub async fn handle_regenerate_section(
    State(state): State<AppState>,
    Path((startup_id, section)): Path<(Uuid, String)>,
) -> Result<Json<SectionEditResponse>, AppError> {
    let section: SectionKey = section.parse()?;
    let response = edit_section(
        state.store.as_ref(),
        &state.llm,
        startup_id,
        section,
        SectionEdit::Regenerate,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/pitches/:startup_id/questions
///
/// Clarifying questions for every section of the current deck below 0.7.
pub async fn handle_questions(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let deck = load_deck(state.store.as_ref(), startup_id).await?;
    let questions = clarifying_questions(&state.llm, &deck.pitch).await;
    record_questions(state.store.as_ref(), &deck, &questions).await?;
    Ok(Json(QuestionsResponse {
        startup_id,
        version: deck.version,
        clarifying_questions: questions,
    }))
}

/// POST /api/v1/pitches/:startup_id/email
pub async fn handle_email(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<EmailDraftResponse>, AppError> {
    let response = draft_email(state.store.as_ref(), &state.llm, startup_id, request).await?;
    Ok(Json(response))
}

/// POST /api/v1/pitches/:startup_id/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
    Json(request): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    let content = request.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    if let Some(rating) = request.rating {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(
                "rating must be between 1 and 5".to_string(),
            ));
        }
    }
    let section = request
        .section
        .as_deref()
        .map(str::parse::<SectionKey>)
        .transpose()?;

    let deck = load_deck(state.store.as_ref(), startup_id).await?;
    let entry = FeedbackEntry {
        pitch_id: deck.id,
        startup_id,
        kind: FeedbackKind::User,
        section,
        content: content.to_string(),
        rating: request.rating,
        created_at: Utc::now(),
    };
    store::log(state.store.as_ref(), FEEDBACK_LOG, &entry).await?;

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            pitch_id: deck.id,
            recorded: true,
        }),
    ))
}

/// POST /api/v1/pitches/:startup_id/export
///
/// Uploads a Markdown rendering of the current deck. 503 when S3 is not configured.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let response = export_pitch(
        state.store.as_ref(),
        state.exporter.as_deref(),
        startup_id,
    )
    .await?;
    Ok(Json(response))
}
