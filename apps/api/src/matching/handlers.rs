//! Axum route handlers for investor matching and valuation.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::matcher::{match_investors, MatchResult};
use crate::matching::stage::resolve_stage;
use crate::matching::valuation::{estimate_valuation, ValuationEstimate};
use crate::models::pitch::{MatchRecord, MatchStatus};
use crate::models::startup::StartupProfile;
use crate::pitch::deck::load_startup;
use crate::state::AppState;
use crate::store::{self, RecordStore, MATCHES};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Either a stored startup (`startup_id`) or an inline `profile`. Stored startups
/// get their matches persisted.
#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub startup_id: Option<Uuid>,
    #[serde(default)]
    pub profile: Option<StartupProfile>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_id: Option<Uuid>,
    /// Stage used for matching (inferred from valuation when one is given).
    pub stage: String,
    pub valuation: ValuationEstimate,
    pub matches: Vec<MatchResult>,
}

#[derive(Debug, Deserialize)]
pub struct ValuationRequest {
    pub stage: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub age_years: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let (startup_id, profile) = match (request.startup_id, request.profile) {
        (Some(id), _) => (Some(id), load_startup(state.store.as_ref(), id).await?.profile),
        (None, Some(profile)) => (None, profile),
        (None, None) => {
            return Err(AppError::Validation(
                "Provide either startup_id or profile".to_string(),
            ))
        }
    };
    profile.validate_for_matching()?;

    let query = profile.match_query();
    let matches = match_investors(&query, &state.investors, &state.match_weights, &state.llm).await;
    let stage = resolve_stage(query.valuation, &query.stage);
    let valuation = estimate_valuation(
        &profile.stage,
        &profile.industry,
        valuation_location(&profile),
        profile.age_years,
    );

    if let Some(id) = startup_id {
        persist_matches(state.store.as_ref(), id, &matches).await?;
    }

    info!(
        "Matched '{}' against {} investors: {} results",
        profile.name,
        state.investors.len(),
        matches.len()
    );

    Ok(Json(MatchResponse {
        startup_id,
        stage,
        valuation,
        matches,
    }))
}

/// POST /api/v1/valuation
pub async fn handle_valuation(
    Json(request): Json<ValuationRequest>,
) -> Result<Json<ValuationEstimate>, AppError> {
    if request.stage.trim().is_empty() {
        return Err(AppError::Validation("stage cannot be empty".to_string()));
    }
    if !request.age_years.is_finite() || request.age_years < 0.0 {
        return Err(AppError::Validation(
            "age_years must be a non-negative number".to_string(),
        ));
    }
    Ok(Json(estimate_valuation(
        &request.stage,
        &request.industry,
        &request.location,
        request.age_years,
    )))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// The location table mixes cities and countries; the city wins when present.
fn valuation_location(profile: &StartupProfile) -> &str {
    let city = profile.city.trim();
    if city.is_empty() {
        profile.country.trim()
    } else {
        city
    }
}

/// Upserts one `pending` match per result. Investors already contacted keep that status.
async fn persist_matches(
    store: &dyn RecordStore,
    startup_id: Uuid,
    matches: &[MatchResult],
) -> Result<(), AppError> {
    for m in matches {
        let key = MatchRecord::key(startup_id, &m.investor_id);
        let existing: Option<MatchRecord> = store::load(store, MATCHES, &key).await?;
        let status = existing
            .map(|record| record.status)
            .unwrap_or(MatchStatus::Pending);
        let record = MatchRecord {
            id: key.clone(),
            startup_id,
            investor_id: m.investor_id.clone(),
            investor_name: m.name.clone(),
            score: m.score,
            reasons: m.reasons.clone(),
            status,
            updated_at: Utc::now(),
        };
        store::save(store, MATCHES, &key, &record).await?;
    }
    Ok(())
}
