use std::sync::Arc;

use crate::llm_client::LlmRouter;
use crate::matching::investors::InvestorTable;
use crate::matching::matcher::MatchWeights;
use crate::pitch::export::PitchExporter;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres or JSON-file backend, chosen at startup.
    pub store: Arc<dyn RecordStore>,
    pub llm: LlmRouter,
    /// Loaded once from the investor CSV; read-only afterwards.
    pub investors: Arc<InvestorTable>,
    pub match_weights: MatchWeights,
    /// `None` when S3_BUCKET is unset; the export endpoint then answers 503.
    pub exporter: Option<Arc<dyn PitchExporter>>,
}
