pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::pitch::handlers as pitch;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pitch API
        .route("/api/v1/pitches", post(pitch::handle_generate_pitch))
        .route("/api/v1/pitches/analyze", post(pitch::handle_analyze))
        .route("/api/v1/pitches/:startup_id", get(pitch::handle_get_pitch))
        .route(
            "/api/v1/pitches/:startup_id/sections/:section/improve",
            post(pitch::handle_improve_section),
        )
        .route(
            "/api/v1/pitches/:startup_id/sections/:section/regenerate",
            post(pitch::handle_regenerate_section),
        )
        .route(
            "/api/v1/pitches/:startup_id/questions",
            get(pitch::handle_questions),
        )
        .route("/api/v1/pitches/:startup_id/email", post(pitch::handle_email))
        .route(
            "/api/v1/pitches/:startup_id/feedback",
            post(pitch::handle_feedback),
        )
        .route("/api/v1/pitches/:startup_id/export", post(pitch::handle_export))
        // Matching API
        .route("/api/v1/match", post(matching::handle_match))
        .route("/api/v1/valuation", post(matching::handle_valuation))
        .with_state(state)
}
