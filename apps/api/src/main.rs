mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod pitch;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{AnthropicClient, LlmRouter, OpenAiClient};
use crate::matching::investors::InvestorTable;
use crate::pitch::export::{PitchExporter, S3Exporter};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{JsonFileStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Fails on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PitchSense API v{}", env!("CARGO_PKG_VERSION"));

    // Record store: Postgres when configured, JSON files otherwise
    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => Arc::new(PgRecordStore::new(create_pool(url).await?)),
        None => {
            let store = JsonFileStore::open(&config.data_dir).with_context(|| {
                format!("cannot open data directory {}", config.data_dir.display())
            })?;
            info!("Using JSON file store at {}", store.root().display());
            Arc::new(store)
        }
    };

    // Investor table
    let investors = InvestorTable::load(&config.investors_csv)?;
    if investors.is_empty() {
        warn!("Investor table is empty; /api/v1/match will return no matches");
    }

    // LLM backends: OpenAI is primary, Anthropic handles section rewrites
    let llm = LlmRouter::new(
        Arc::new(OpenAiClient::new(config.openai_api_key.clone())?),
        Arc::new(AnthropicClient::new(config.anthropic_api_key.clone())?),
    );
    info!("LLM router initialized");

    // Optional S3 export
    let exporter: Option<Arc<dyn PitchExporter>> = match &config.s3_bucket {
        Some(bucket) => {
            let s3 = build_s3_client(&config).await;
            info!("S3 export enabled (bucket: {bucket})");
            Some(Arc::new(S3Exporter::new(s3, bucket.clone())))
        }
        None => {
            info!("S3_BUCKET not set; pitch export disabled");
            None
        }
    };

    // Build app state
    let state = AppState {
        store,
        llm,
        investors: Arc::new(investors),
        match_weights: config.match_weights.clone(),
        exporter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (custom endpoint) or AWS.
/// Static credentials are used only when both keys are configured.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"));

    if let (Some(key_id), Some(secret)) = (&config.aws_access_key_id, &config.aws_secret_access_key)
    {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "pitchsense-static",
        ));
    }
    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    aws_sdk_s3::Client::new(&loader.load().await)
}
