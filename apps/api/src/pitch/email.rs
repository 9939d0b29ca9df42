//! Cold-email drafting for a named investor.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmRouter, TaskType};
use crate::matching::investors::investor_id;
use crate::models::pitch::{CommunicationEntry, MatchRecord, MatchStatus};
use crate::models::startup::StartupProfile;
use crate::pitch::analyzer::Pitch;
use crate::pitch::deck::{load_deck, load_startup};
use crate::pitch::prompts::EMAIL_PROMPT_TEMPLATE;
use crate::pitch::sections::SectionKey;
use crate::store::{self, RecordStore, COMMUNICATIONS_LOG, MATCHES};

const TEMPLATE_MARKER: &str = "[TEMPLATE - edit before sending]";

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub investor_name: String,
    #[serde(default)]
    pub investor_focus: Option<String>,
    #[serde(default)]
    pub founder_name: Option<String>,
    #[serde(default)]
    pub founder_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailDraftResponse {
    pub startup_id: Uuid,
    pub investor_id: String,
    pub investor_name: String,
    pub content: String,
    /// True when the LLM draft failed and a fill-in template was returned instead.
    pub is_template: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

pub async fn draft_email(
    store: &dyn RecordStore,
    llm: &LlmRouter,
    startup_id: Uuid,
    request: EmailRequest,
) -> Result<EmailDraftResponse, AppError> {
    let investor_name = request.investor_name.trim().to_string();
    if investor_name.is_empty() {
        return Err(AppError::Validation("investor_name cannot be empty".to_string()));
    }

    let startup = load_startup(store, startup_id).await?;
    let deck = load_deck(store, startup_id).await?;
    let traction = section_text(&deck.pitch, SectionKey::Traction);
    let ask = section_text(&deck.pitch, SectionKey::Ask);

    let founder_name = non_blank(request.founder_name.as_deref()).unwrap_or("[Your Name]");
    let founder_email = non_blank(request.founder_email.as_deref()).unwrap_or("[Your Email]");
    let investor_context = non_blank(request.investor_focus.as_deref())
        .map(|focus| format!(" (focus: {focus})"))
        .unwrap_or_default();

    let prompt = EMAIL_PROMPT_TEMPLATE
        .replace("{startup_name}", &startup.profile.name)
        .replace("{investor_name}", &investor_name)
        .replace("{investor_context}", &investor_context)
        .replace("{traction}", traction)
        .replace("{ask}", ask)
        .replace("{founder_name}", founder_name)
        .replace("{founder_email}", founder_email);

    let (content, is_template, fallback_reason) =
        match llm.complete(TaskType::Email, &prompt, None).await {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), false, None),
            Ok(_) => (
                template_email(&startup.profile, &investor_name, traction, ask, founder_name),
                true,
                Some("Email draft unavailable: model returned no text".to_string()),
            ),
            Err(e) => {
                warn!("Email draft for {investor_name} failed, returning template: {e}");
                (
                    template_email(&startup.profile, &investor_name, traction, ask, founder_name),
                    true,
                    Some(format!("Email draft unavailable: {e}")),
                )
            }
        };

    let investor_id = investor_id(&investor_name);
    let entry = CommunicationEntry {
        startup_id,
        investor_name: investor_name.clone(),
        kind: "email".to_string(),
        status: if is_template { "template" } else { "draft" }.to_string(),
        content: content.clone(),
        created_at: Utc::now(),
    };
    // Log only once the match record is written.
    mark_contacted(store, startup_id, &investor_id, &investor_name).await?;
    store::log(store, COMMUNICATIONS_LOG, &entry).await?;

    info!("Drafted email from {startup_id} to {investor_name} (template: {is_template})");

    Ok(EmailDraftResponse {
        startup_id,
        investor_id,
        investor_name,
        content,
        is_template,
        fallback_reason,
    })
}

/// Upserts the startup–investor match with status "contacted", keeping any score.
async fn mark_contacted(
    store: &dyn RecordStore,
    startup_id: Uuid,
    investor_id: &str,
    investor_name: &str,
) -> Result<(), AppError> {
    let key = MatchRecord::key(startup_id, investor_id);
    let existing: Option<MatchRecord> = store::load(store, MATCHES, &key).await?;
    let record = match existing {
        Some(mut record) => {
            record.status = MatchStatus::Contacted;
            record.updated_at = Utc::now();
            record
        }
        None => MatchRecord {
            id: key.clone(),
            startup_id,
            investor_id: investor_id.to_string(),
            investor_name: investor_name.to_string(),
            score: 0.0,
            reasons: Vec::new(),
            status: MatchStatus::Contacted,
            updated_at: Utc::now(),
        },
    };
    store::save(store, MATCHES, &key, &record).await?;
    Ok(())
}

fn section_text(pitch: &Pitch, key: SectionKey) -> &str {
    pitch.get(&key).map(|s| s.text.as_str()).unwrap_or("")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn template_email(
    profile: &StartupProfile,
    investor_name: &str,
    traction: &str,
    ask: &str,
    founder_name: &str,
) -> String {
    let traction = if traction.trim().is_empty() {
        "[Key traction metrics]"
    } else {
        traction.trim()
    };
    let ask = if ask.trim().is_empty() {
        "[Funding ask and use of funds]"
    } else {
        ask.trim()
    };
    format!(
        "{TEMPLATE_MARKER}\n\
         Subject: Introducing {name}: {industry} startup raising a {stage} round\n\
         \n\
         Dear {investor_name},\n\
         \n\
         I'm {founder_name}, founder of {name}. {traction} {ask}\n\
         \n\
         Would you be open to a 20-minute call next week? I'm happy to share the deck in advance.\n\
         \n\
         Best regards,\n\
         {founder_name}\n\
         {name}",
        name = profile.name,
        industry = profile.industry,
        stage = profile.stage,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::router::testing::{router, ScriptedBackend};
    use crate::models::startup::StartupRecord;
    use crate::pitch::analyzer::analyze_section;
    use crate::pitch::deck::save_next_version;
    use crate::pitch::generator::fixtures::profile;
    use crate::store::{JsonFileStore, STARTUPS};

    async fn seeded() -> (tempfile::TempDir, JsonFileStore, Uuid) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let id = Uuid::new_v4();
        let record = StartupRecord {
            id,
            profile: profile(),
            created_at: Utc::now(),
        };
        store::save(&store, STARTUPS, &id.to_string(), &record)
            .await
            .unwrap();
        let mut pitch = Pitch::new();
        pitch.insert(
            SectionKey::Traction,
            analyze_section("Acme has 12 pilot customers.", &["Acme"]),
        );
        pitch.insert(SectionKey::Ask, analyze_section("Raising $1.5M.", &["Acme"]));
        save_next_version(&store, id, pitch, vec![]).await.unwrap();
        (dir, store, id)
    }

    fn request(name: &str) -> EmailRequest {
        EmailRequest {
            investor_name: name.to_string(),
            investor_focus: Some("Logistics".to_string()),
            founder_name: Some("Ada".to_string()),
            founder_email: None,
        }
    }

    #[tokio::test]
    async fn test_draft_logs_communication_and_marks_contacted() {
        let (_dir, store, id) = seeded().await;
        let a = ScriptedBackend::ok("a", &["Subject: Acme\nSubject: Acme\n\nHi Alpha,"]);
        let llm = router(a.clone(), ScriptedBackend::ok("b", &[]));

        let resp = draft_email(&store, &llm, id, request("Alpha Capital"))
            .await
            .unwrap();
        assert!(!resp.is_template);
        assert_eq!(resp.content, "Subject: Acme\n\nHi Alpha,");
        assert_eq!(resp.investor_id, "alpha_capital");

        let prompt = a.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Acme has 12 pilot customers."));
        assert!(prompt.contains("Alpha Capital (focus: Logistics)"));
        assert!(prompt.contains("Founder Email: [Your Email]"));

        let log = store.read_log(COMMUNICATIONS_LOG).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0]["status"], "draft");

        let m: MatchRecord = store::load(&store, MATCHES, &MatchRecord::key(id, "alpha_capital"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.status, MatchStatus::Contacted);
    }

    #[tokio::test]
    async fn test_failure_returns_marked_template() {
        let (_dir, store, id) = seeded().await;
        // No scripted replies: the backend answers EmptyContent.
        let llm = router(ScriptedBackend::ok("a", &[]), ScriptedBackend::ok("b", &[]));

        let resp = draft_email(&store, &llm, id, request("Beta Partners"))
            .await
            .unwrap();
        assert!(resp.is_template);
        assert!(resp.content.starts_with(TEMPLATE_MARKER));
        assert!(resp.content.contains("Dear Beta Partners"));
        assert!(resp.content.contains("Acme has 12 pilot customers."));
        assert!(resp.fallback_reason.is_some());

        let log = store.read_log(COMMUNICATIONS_LOG).await.unwrap();
        assert_eq!(log[0]["status"], "template");
    }

    #[tokio::test]
    async fn test_existing_match_keeps_score() {
        let (_dir, store, id) = seeded().await;
        let key = MatchRecord::key(id, "alpha_capital");
        let seeded_match = MatchRecord {
            id: key.clone(),
            startup_id: id,
            investor_id: "alpha_capital".to_string(),
            investor_name: "Alpha Capital".to_string(),
            score: 8.0,
            reasons: vec!["same country".to_string()],
            status: MatchStatus::Pending,
            updated_at: Utc::now(),
        };
        store::save(&store, MATCHES, &key, &seeded_match).await.unwrap();

        let llm = router(ScriptedBackend::ok("a", &["Hello"]), ScriptedBackend::ok("b", &[]));
        draft_email(&store, &llm, id, request("Alpha Capital"))
            .await
            .unwrap();

        let m: MatchRecord = store::load(&store, MATCHES, &key).await.unwrap().unwrap();
        assert_eq!(m.status, MatchStatus::Contacted);
        assert_eq!(m.score, 8.0);
    }

    #[tokio::test]
    async fn test_validation_and_not_found() {
        let (_dir, store, _) = seeded().await;
        let llm = router(ScriptedBackend::ok("a", &[]), ScriptedBackend::ok("b", &[]));

        let err = draft_email(&store, &llm, Uuid::new_v4(), request(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = draft_email(&store, &llm, Uuid::new_v4(), request("Alpha"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
