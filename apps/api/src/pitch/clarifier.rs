//! Clarifying questions for weak pitch sections.
//!
//! Every section below `CLARIFY_THRESHOLD` gets 2-3 questions from the LLM as a
//! strict JSON array. Invalid output is re-prompted once; after that the section gets
//! canned questions so the caller always has something to show.

use std::collections::BTreeMap;

use chrono::Utc;
use futures::future::join_all;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmRouter, TaskType};
use crate::models::pitch::{FeedbackEntry, FeedbackKind, PitchDeckRecord};
use crate::pitch::analyzer::{Pitch, PitchSection};
use crate::pitch::prompts::CLARIFY_PROMPT_TEMPLATE;
use crate::pitch::sections::SectionKey;
use crate::store::{self, RecordStore, FEEDBACK_LOG};

pub const CLARIFY_THRESHOLD: f64 = 0.7;
const MIN_QUESTIONS: usize = 2;
const MAX_QUESTIONS: usize = 3;

pub type SectionQuestions = BTreeMap<SectionKey, Vec<String>>;

/// Questions for every weak section, requested concurrently.
pub async fn clarifying_questions(llm: &LlmRouter, pitch: &Pitch) -> SectionQuestions {
    let weak: Vec<(SectionKey, &PitchSection)> = pitch
        .iter()
        .filter(|(_, section)| section.confidence < CLARIFY_THRESHOLD)
        .map(|(key, section)| (*key, section))
        .collect();

    let answers = join_all(
        weak.iter()
            .map(|(key, section)| questions_for_section(llm, *key, section)),
    )
    .await;

    weak.into_iter()
        .map(|(key, _)| key)
        .zip(answers)
        .collect()
}

async fn questions_for_section(
    llm: &LlmRouter,
    key: SectionKey,
    section: &PitchSection,
) -> Vec<String> {
    let weak_reasons = section
        .sentences
        .iter()
        .filter(|s| s.confidence < CLARIFY_THRESHOLD)
        .map(|s| format!("- \"{}\": {}", s.text, s.reason))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = CLARIFY_PROMPT_TEMPLATE
        .replace("{section_title}", key.title())
        .replace("{section_text}", &section.text)
        .replace("{weak_reasons}", &weak_reasons);

    let result: Result<Vec<String>, _> = llm
        .complete_json(
            TaskType::ClarifyingQuestions,
            &prompt,
            Some(JSON_ONLY_SYSTEM),
            |questions: &Vec<String>| validate_questions(questions),
        )
        .await;

    match result {
        Ok(questions) => questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .take(MAX_QUESTIONS)
            .collect(),
        Err(e) => {
            warn!("Clarifying questions for {key} failed, using canned questions: {e}");
            canned_questions(key)
        }
    }
}

fn validate_questions(questions: &[String]) -> Result<(), String> {
    if questions.len() < MIN_QUESTIONS {
        return Err(format!(
            "expected {MIN_QUESTIONS}-{MAX_QUESTIONS} questions, got {}",
            questions.len()
        ));
    }
    if questions.iter().any(|q| q.trim().is_empty()) {
        return Err("questions must be non-empty strings".to_string());
    }
    Ok(())
}

pub fn canned_questions(key: SectionKey) -> Vec<String> {
    let questions: [&str; 2] = match key {
        SectionKey::Problem => [
            "Who exactly experiences this problem, and how often?",
            "What does the problem cost them today in time or money?",
        ],
        SectionKey::Solution => [
            "What measurable result have users seen from the product so far?",
            "Which part of the product is hardest for others to copy?",
        ],
        SectionKey::Market => [
            "What are your TAM and SAM figures, and where do they come from?",
            "How fast is the segment you serve growing each year?",
        ],
        SectionKey::BusinessModel => [
            "What do you charge, and who pays?",
            "What are your current unit economics (CAC, LTV, gross margin)?",
        ],
        SectionKey::Competition => [
            "Which competitors do customers compare you with most often?",
            "Why do customers pick you over them, in their own words?",
        ],
        SectionKey::Traction => [
            "How many paying customers or active users do you have today?",
            "What is your month-over-month growth over the last six months?",
        ],
        SectionKey::Ask => [
            "How much are you raising, and at what valuation?",
            "Which milestones will this round fund, and by when?",
        ],
    };
    questions.iter().map(|q| q.to_string()).collect()
}

/// Appends one feedback-log entry per section that received questions.
pub async fn record_questions(
    store: &dyn RecordStore,
    deck: &PitchDeckRecord,
    questions: &SectionQuestions,
) -> Result<(), AppError> {
    for (key, qs) in questions {
        let entry = FeedbackEntry {
            pitch_id: deck.id,
            startup_id: deck.startup_id,
            kind: FeedbackKind::ClarifyingQuestion,
            section: Some(*key),
            content: qs.join("\n"),
            rating: None,
            created_at: Utc::now(),
        };
        store::log(store, FEEDBACK_LOG, &entry).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::router::testing::{router, ScriptedBackend};
    use crate::pitch::analyzer::analyze_section;

    fn pitch(pairs: &[(SectionKey, &str)]) -> Pitch {
        pairs
            .iter()
            .map(|(k, text)| (*k, analyze_section(text, &["Acme"])))
            .collect()
    }

    #[tokio::test]
    async fn test_only_weak_sections_get_questions() {
        let p = pitch(&[
            (SectionKey::Problem, "Many shippers lose money."), // 0.6
            (SectionKey::Traction, "Acme enabled 40 shippers to save time."), // 0.85
        ]);
        let a = ScriptedBackend::ok("a", &[r#"["Which shippers?", "How much money?"]"#]);
        let llm = router(a.clone(), ScriptedBackend::ok("b", &[]));

        let questions = clarifying_questions(&llm, &p).await;
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[&SectionKey::Problem],
            vec!["Which shippers?", "How much money?"]
        );
        assert_eq!(a.calls(), 1);
        assert!(a.prompts.lock().unwrap()[0].contains("Contains vague or non-specific language"));
    }

    #[tokio::test]
    async fn test_too_many_questions_are_truncated() {
        let p = pitch(&[(SectionKey::Market, "We think it is big.")]);
        let a = ScriptedBackend::ok("a", &[r#"["q1", "q2", "q3", "q4"]"#]);
        let llm = router(a, ScriptedBackend::ok("b", &[]));
        let questions = clarifying_questions(&llm, &p).await;
        assert_eq!(questions[&SectionKey::Market], vec!["q1", "q2", "q3"]);
    }

    #[tokio::test]
    async fn test_invalid_output_reprompts_then_falls_back() {
        let p = pitch(&[(SectionKey::Ask, "We aim to raise soon.")]);
        let a = ScriptedBackend::ok("a", &["1. How much?\n2. When?", r#"["only one"]"#]);
        let llm = router(a.clone(), ScriptedBackend::ok("b", &[]));

        let questions = clarifying_questions(&llm, &p).await;
        assert_eq!(questions[&SectionKey::Ask], canned_questions(SectionKey::Ask));
        assert_eq!(a.calls(), 2);
    }

    #[tokio::test]
    async fn test_strong_pitch_needs_no_questions() {
        let p = pitch(&[(SectionKey::Solution, "Acme enabled 3x faster audits.")]);
        let a = ScriptedBackend::ok("a", &[]);
        let llm = router(a.clone(), ScriptedBackend::ok("b", &[]));
        assert!(clarifying_questions(&llm, &p).await.is_empty());
        assert_eq!(a.calls(), 0);
    }

    #[test]
    fn test_every_section_has_canned_questions() {
        for key in SectionKey::ALL {
            let qs = canned_questions(key);
            assert!(qs.len() >= MIN_QUESTIONS && qs.len() <= MAX_QUESTIONS);
        }
    }
}
