use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pitch::analyzer::Pitch;
use crate::pitch::sections::SectionKey;

/// Stored in the `pitches` collection, keyed by `startup_id` (one deck per startup).
/// `version` starts at 1 and increments on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchDeckRecord {
    pub id: Uuid,
    pub startup_id: Uuid,
    pub pitch: Pitch,
    pub user_inputs: Vec<String>,
    pub version: u32,
    pub updated_at: DateTime<Utc>,
}

/// Stored in the `matches` collection, keyed by `{startup_id}__{investor_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub startup_id: Uuid,
    pub investor_id: String,
    pub investor_name: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub status: MatchStatus,
    pub updated_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn key(startup_id: Uuid, investor_id: &str) -> String {
        format!("{startup_id}__{investor_id}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Contacted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// Free-text feedback from the founder.
    User,
    /// Questions the clarifier asked about a weak section.
    ClarifyingQuestion,
}

/// Appended to the `feedback` log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub pitch_id: Uuid,
    pub startup_id: Uuid,
    pub kind: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionKey>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// Appended to the `communications` log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationEntry {
    pub startup_id: Uuid,
    pub investor_name: String,
    pub kind: String,
    pub status: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
