//! Markdown export of the stored pitch deck to S3.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pitch::PitchDeckRecord;
use crate::models::startup::StartupProfile;
use crate::pitch::analyzer::overall_confidence;
use crate::pitch::deck::{load_deck, load_startup};
use crate::store::RecordStore;

/// Destination for rendered documents. Absent when S3 is not configured.
#[async_trait]
pub trait PitchExporter: Send + Sync {
    /// Uploads `markdown` under `key` and returns its URI.
    async fn upload(&self, key: &str, markdown: String) -> Result<String, AppError>;
}

pub struct S3Exporter {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Exporter {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl PitchExporter for S3Exporter {
    async fn upload(&self, key: &str, markdown: String) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(markdown.into_bytes()))
            .content_type("text/markdown")
            .send()
            .await
            .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

        let uri = format!("s3://{}/{}", self.bucket, key);
        info!("Uploaded pitch export to {uri}");
        Ok(uri)
    }
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub startup_id: Uuid,
    pub version: u32,
    pub key: String,
    pub uri: String,
}

pub fn export_key(startup_id: Uuid, version: u32) -> String {
    format!("pitches/{startup_id}/v{version}.md")
}

pub async fn export_pitch(
    store: &dyn RecordStore,
    exporter: Option<&dyn PitchExporter>,
    startup_id: Uuid,
) -> Result<ExportResponse, AppError> {
    let exporter = exporter.ok_or_else(|| {
        AppError::Unavailable("Pitch export is disabled: S3_BUCKET is not configured".to_string())
    })?;

    let startup = load_startup(store, startup_id).await?;
    let deck = load_deck(store, startup_id).await?;

    let key = export_key(startup_id, deck.version);
    let markdown = render_pitch_to_md(&startup.profile, &deck);
    let uri = exporter.upload(&key, markdown).await?;

    Ok(ExportResponse {
        startup_id,
        version: deck.version,
        key,
        uri,
    })
}

/// Section headings in presentation order, each with its text and confidence.
pub fn render_pitch_to_md(profile: &StartupProfile, deck: &PitchDeckRecord) -> String {
    let mut md = format!("# {} Investor Pitch\n\n", profile.name);
    md.push_str(&format!("- **Industry:** {}\n", profile.industry));
    md.push_str(&format!("- **Stage:** {}\n", profile.stage));
    let location = profile.location();
    if !location.is_empty() {
        md.push_str(&format!("- **Location:** {location}\n"));
    }
    md.push_str(&format!("- **Version:** {}\n", deck.version));
    md.push_str(&format!(
        "- **Overall confidence:** {:.2}\n",
        overall_confidence(&deck.pitch)
    ));
    md.push_str(&format!("- **Updated:** {}\n\n", deck.updated_at.to_rfc3339()));

    for (key, section) in &deck.pitch {
        md.push_str(&format!("## {}\n\n", key.title()));
        md.push_str(section.text.trim());
        md.push_str(&format!("\n\n_Confidence: {:.2}_\n\n", section.confidence));
    }
    md
}
