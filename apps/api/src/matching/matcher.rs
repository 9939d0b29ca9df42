//! Investor matcher: additive multi-factor score per investor, stable ranking, top-N,
//! then one LLM insight per surviving match.
//!
//! Scoring is pure (`score_investor`, `rank_investors`). Only `match_investors`
//! touches the LLM, and an insight failure never fails the match.

use std::cmp::Ordering;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::{LlmRouter, TaskType};
use crate::matching::industry::normalize_industry;
use crate::matching::investors::{investor_id, InvestorRecord, InvestorTable};
use crate::matching::prompts::{INSIGHT_PROMPT_TEMPLATE, INSIGHT_SYSTEM};
use crate::matching::stage::{is_stage_compatible, resolve_stage};

const REGION_TOKENS: &[&str] = &["asia", "europe", "america"];
const GENERIC_NAME_WORDS: &[&str] = &["ventures", "capital", "partners"];

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Scoring weights and thresholds. Defaults reproduce the production tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchWeights {
    pub industry_exact: f64,
    pub industry_overlap: f64,
    pub industry_similar: f64,
    /// Character match ratio (0..1) strictly above which the "similar industry" weight
    /// applies.
    pub fuzzy_threshold: f64,
    pub same_country: f64,
    pub same_city: f64,
    pub same_region: f64,
    pub stage_fit: f64,
    pub existing_investor: f64,
    /// Subtracted when the valuation is above `seed_penalty_valuation` and the
    /// investor writes seed cheques.
    pub seed_penalty: f64,
    pub seed_penalty_valuation: f64,
    pub top_n: usize,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            industry_exact: 4.0,
            industry_overlap: 3.0,
            industry_similar: 2.0,
            fuzzy_threshold: 0.3,
            same_country: 2.0,
            same_city: 1.0,
            same_region: 1.0,
            stage_fit: 2.0,
            existing_investor: 1.0,
            seed_penalty: 1.0,
            seed_penalty_valuation: 50.0,
            top_n: 5,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Startup attributes the matcher looks at.
#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    pub startup_name: String,
    pub industry: String,
    pub stage: String,
    pub city: String,
    pub country: String,
    /// Millions. Drives stage inference and the seed penalty.
    pub valuation: Option<f64>,
    pub existing_investors: Vec<String>,
}

/// Pure scoring output for one investor.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredInvestor<'a> {
    pub investor: &'a InvestorRecord,
    pub score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub investor_id: String,
    pub name: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub focus: String,
    pub stage: String,
    pub location: String,
    pub personalized_insight: String,
}

/// Query values lowercased once, shared across every investor scored.
struct Prepared {
    industry: String,
    stage: String,
    city: String,
    country: String,
    valuation: Option<f64>,
    existing_investors: String,
}

impl Prepared {
    fn new(query: &MatchQuery) -> Self {
        Self {
            industry: normalize_industry(&query.industry),
            stage: resolve_stage(query.valuation, &query.stage),
            city: query.city.trim().to_lowercase(),
            country: query.country.trim().to_lowercase(),
            valuation: query.valuation,
            existing_investors: query
                .existing_investors
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub fn score_investor<'a>(
    query: &MatchQuery,
    investor: &'a InvestorRecord,
    weights: &MatchWeights,
) -> ScoredInvestor<'a> {
    score_prepared(&Prepared::new(query), investor, weights)
}

/// Character-level match ratio, `2 * matches / (len(a) + len(b))`.
fn similarity(a: &str, b: &str) -> f64 {
    f64::from(similar::TextDiff::from_chars(a, b).ratio())
}

fn score_prepared<'a>(
    q: &Prepared,
    investor: &'a InvestorRecord,
    weights: &MatchWeights,
) -> ScoredInvestor<'a> {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    // Industry
    let focus = investor.fund_focus.trim().to_lowercase();
    if !q.industry.is_empty() {
        let bucket = &q.industry;
        if *bucket == normalize_industry(&focus) {
            score += weights.industry_exact;
            reasons.push(format!("perfect industry match ({bucket})"));
        } else if focus.contains(bucket.as_str())
            || bucket.split_whitespace().any(|w| focus.contains(w))
        {
            score += weights.industry_overlap;
            reasons.push(format!("industry overlap ({bucket})"));
        } else if similarity(bucket, &focus) > weights.fuzzy_threshold {
            score += weights.industry_similar;
            reasons.push("similar industry".to_string());
        }
    }

    // Geography: first applicable rule only
    let location = investor.location.trim().to_lowercase();
    if !q.country.is_empty() && location.contains(&q.country) {
        score += weights.same_country;
        reasons.push("same country".to_string());
    } else if !q.city.is_empty() && location.contains(&q.city) {
        score += weights.same_city;
        reasons.push("same city".to_string());
    } else if q.country != "united states" && REGION_TOKENS.iter().any(|r| location.contains(r))
    {
        score += weights.same_region;
        reasons.push("regional match".to_string());
    }

    // Stage
    if is_stage_compatible(&q.stage, &investor.fund_stage) {
        score += weights.stage_fit;
        reasons.push(format!("stage fit ({})", q.stage));
    }

    // Existing investor
    if has_existing_relationship(&q.existing_investors, &investor.name) {
        score += weights.existing_investor;
        reasons.push("existing investor".to_string());
    }

    // Penalty
    let valuation = q.valuation.unwrap_or(0.0);
    if valuation > weights.seed_penalty_valuation
        && investor.fund_stage.to_lowercase().contains("seed")
    {
        score -= weights.seed_penalty;
        reasons.push("valuation too high for seed-stage VC".to_string());
    }

    ScoredInvestor {
        investor,
        score,
        reasons,
    }
}

/// True when a distinctive token (> 2 chars, generic fund words removed) of the
/// investor name appears in the startup's current investor list.
fn has_existing_relationship(existing_investors: &str, investor_name: &str) -> bool {
    if existing_investors.is_empty() {
        return false;
    }
    let mut name = investor_name.to_lowercase();
    for word in GENERIC_NAME_WORDS {
        name = name.replace(word, "");
    }
    name.split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .any(|token| existing_investors.contains(token))
}

/// Scores every investor, sorts by score descending (ties keep table order) and keeps
/// the top `weights.top_n`.
pub fn rank_investors<'a>(
    query: &MatchQuery,
    table: &'a InvestorTable,
    weights: &MatchWeights,
) -> Vec<ScoredInvestor<'a>> {
    let prepared = Prepared::new(query);
    let mut scored: Vec<ScoredInvestor<'a>> = table
        .records()
        .iter()
        .map(|inv| score_prepared(&prepared, inv, weights))
        .collect();

    // sort_by is stable.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(weights.top_n);
    scored
}

// ────────────────────────────────────────────────────────────────────────────
// Full match with insights
// ────────────────────────────────────────────────────────────────────────────

/// Ranks investors and attaches a personalized insight to each of the top matches.
/// Insight calls run concurrently; a failed call falls back to a generic insight.
pub async fn match_investors(
    query: &MatchQuery,
    table: &InvestorTable,
    weights: &MatchWeights,
    llm: &LlmRouter,
) -> Vec<MatchResult> {
    let ranked = rank_investors(query, table, weights);
    let stage = resolve_stage(query.valuation, &query.stage);
    info!(
        "Ranked {} investors for '{}' (stage {stage}), fetching {} insights",
        table.len(),
        query.startup_name,
        ranked.len()
    );

    let insights = join_all(
        ranked
            .iter()
            .map(|candidate| personalized_insight(query, &stage, candidate, llm)),
    )
    .await;

    ranked
        .into_iter()
        .zip(insights)
        .map(|(candidate, insight)| MatchResult {
            investor_id: investor_id(&candidate.investor.name),
            name: candidate.investor.name.clone(),
            score: candidate.score,
            reasons: candidate.reasons,
            focus: candidate.investor.fund_focus.clone(),
            stage: candidate.investor.fund_stage.clone(),
            location: candidate.investor.location.clone(),
            personalized_insight: insight,
        })
        .collect()
}

async fn personalized_insight(
    query: &MatchQuery,
    stage: &str,
    candidate: &ScoredInvestor<'_>,
    llm: &LlmRouter,
) -> String {
    let investor = candidate.investor;
    let prompt = INSIGHT_PROMPT_TEMPLATE
        .replace("{startup_name}", &query.startup_name)
        .replace("{industry}", &query.industry)
        .replace("{stage}", stage)
        .replace("{investor_name}", &investor.name)
        .replace("{focus}", &investor.fund_focus)
        .replace("{investor_stage}", &investor.fund_stage)
        .replace("{location}", &investor.location)
        .replace("{reasons}", &candidate.reasons.join(" | "));

    match llm
        .complete(TaskType::InvestorInsight, &prompt, Some(INSIGHT_SYSTEM))
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => generic_insight(investor),
        Err(e) => {
            warn!("Insight for {} failed, using generic text: {e}", investor.name);
            generic_insight(investor)
        }
    }
}

fn generic_insight(investor: &InvestorRecord) -> String {
    let focus = if investor.fund_focus.trim().is_empty() {
        "a broad set of sectors"
    } else {
        investor.fund_focus.trim()
    };
    format!(
        "Generic insight (personalized analysis unavailable): {} invests in {focus}; \
         review their recent deals to confirm fit.",
        investor.name
    )
}
