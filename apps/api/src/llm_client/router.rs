//! Task-based routing between the two LLM backends.
//!
//! Backend A (primary): pitch generation, clarifying questions, and anything unlisted.
//! Backend B (secondary): section improvement and regeneration.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::prompts::CORRECTIVE_REPROMPT;
use super::{dedupe_lines, strip_json_fences, LlmBackend, LlmError};

/// What a prompt is for. Drives backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    PitchGeneration,
    ClarifyingQuestions,
    Improve,
    Regenerate,
    InvestorInsight,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Primary,
    Secondary,
}

impl TaskType {
    pub fn backend(self) -> Backend {
        match self {
            TaskType::PitchGeneration | TaskType::ClarifyingQuestions => Backend::Primary,
            TaskType::Improve | TaskType::Regenerate => Backend::Secondary,
            _ => Backend::Primary,
        }
    }
}

#[derive(Clone)]
pub struct LlmRouter {
    primary: Arc<dyn LlmBackend>,
    secondary: Arc<dyn LlmBackend>,
}

impl LlmRouter {
    pub fn new(primary: Arc<dyn LlmBackend>, secondary: Arc<dyn LlmBackend>) -> Self {
        Self { primary, secondary }
    }

    pub fn backend_name(&self, task: TaskType) -> &'static str {
        self.backend_for(task).name()
    }

    fn backend_for(&self, task: TaskType) -> &dyn LlmBackend {
        match task.backend() {
            Backend::Primary => self.primary.as_ref(),
            Backend::Secondary => self.secondary.as_ref(),
        }
    }

    /// Sends one prompt to the backend for `task` and returns the cleaned text.
    pub async fn complete(
        &self,
        task: TaskType,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        let backend = self.backend_for(task);
        info!("Routing {:?} to {}", task, backend.name());
        let raw = backend.complete(prompt, system).await?;
        Ok(dedupe_lines(&raw))
    }

    /// Calls the LLM and parses the response as `T`, then runs `validate` on it.
    ///
    /// A response that fails to parse or validate is re-prompted exactly once with
    /// the rejection reason. Transport and API errors are returned immediately.
    pub async fn complete_json<T, F>(
        &self,
        task: TaskType,
        prompt: &str,
        system: Option<&str>,
        validate: F,
    ) -> Result<T, LlmError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> Result<(), String>,
    {
        let first = self.complete(task, prompt, system).await?;
        let reason = match parse_and_validate(&first, &validate) {
            Ok(value) => return Ok(value),
            Err(reason) => reason,
        };

        warn!("{:?} output rejected ({reason}), re-prompting once", task);
        let corrective = format!(
            "{prompt}\n\n{}",
            CORRECTIVE_REPROMPT.replace("{reason}", &reason)
        );
        let second = self.complete(task, &corrective, system).await?;
        parse_and_validate(&second, &validate).map_err(LlmError::InvalidOutput)
    }
}

fn parse_and_validate<T, F>(text: &str, validate: &F) -> Result<T, String>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Result<(), String>,
{
    let value: T = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| format!("response was not valid JSON for the expected schema: {e}"))?;
    validate(&value)?;
    Ok(value)
}


#[cfg(test)]
mod tests {
    use super::testing::{router, ScriptedBackend};
    use super::*;

    #[test]
    fn test_task_routing_table() {
        assert_eq!(TaskType::PitchGeneration.backend(), Backend::Primary);
        assert_eq!(TaskType::ClarifyingQuestions.backend(), Backend::Primary);
        assert_eq!(TaskType::Improve.backend(), Backend::Secondary);
        assert_eq!(TaskType::Regenerate.backend(), Backend::Secondary);
        assert_eq!(TaskType::InvestorInsight.backend(), Backend::Primary);
        assert_eq!(TaskType::Email.backend(), Backend::Primary);
    }

    #[tokio::test]
    async fn test_improve_goes_to_secondary_backend() {
        let a = ScriptedBackend::ok("a", &[]);
        let b = ScriptedBackend::ok("b", &["better text"]);
        let r = router(a.clone(), b.clone());

        let out = r.complete(TaskType::Improve, "improve it", None).await.unwrap();
        assert_eq!(out, "better text");
        assert_eq!(a.calls(), 0);
        assert_eq!(b.calls(), 1);
        assert_eq!(r.backend_name(TaskType::Regenerate), "b");
    }

    #[tokio::test]
    async fn test_complete_applies_line_hygiene() {
        let a = ScriptedBackend::ok("a", &["Line\nLine\n\n\n\nNext\n\n"]);
        let r = router(a, ScriptedBackend::ok("b", &[]));
        let out = r.complete(TaskType::Email, "p", None).await.unwrap();
        assert_eq!(out, "Line\n\nNext");
    }

    #[tokio::test]
    async fn test_complete_json_accepts_fenced_output() {
        let a = ScriptedBackend::ok("a", &["```json\n[\"q1\", \"q2\"]\n```"]);
        let r = router(a.clone(), ScriptedBackend::ok("b", &[]));
        let out: Vec<String> = r
            .complete_json(TaskType::ClarifyingQuestions, "p", None, |_: &Vec<String>| Ok(()))
            .await
            .unwrap();
        assert_eq!(out, vec!["q1", "q2"]);
        assert_eq!(a.calls(), 1);
    }

    #[tokio::test]
    async fn test_complete_json_reprompts_once_with_reason() {
        let a = ScriptedBackend::ok("a", &["not json at all", "[\"fixed\"]"]);
        let r = router(a.clone(), ScriptedBackend::ok("b", &[]));
        let out: Vec<String> = r
            .complete_json(TaskType::ClarifyingQuestions, "original", None, |_: &Vec<String>| Ok(()))
            .await
            .unwrap();
        assert_eq!(out, vec!["fixed"]);
        assert_eq!(a.calls(), 2);
        let prompts = a.prompts.lock().unwrap();
        assert!(prompts[1].starts_with("original"));
        assert!(prompts[1].contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_complete_json_validation_failure_twice_is_invalid_output() {
        let a = ScriptedBackend::ok("a", &["[]", "[]"]);
        let r = router(a.clone(), ScriptedBackend::ok("b", &[]));
        let err = r
            .complete_json(TaskType::ClarifyingQuestions, "p", None, |v: &Vec<String>| {
                if v.is_empty() {
                    Err("no questions returned".to_string())
                } else {
                    Ok(())
                }
            })
            .await
            .unwrap_err();
        match err {
            LlmError::InvalidOutput(reason) => assert_eq!(reason, "no questions returned"),
            other => panic!("expected InvalidOutput, got {other:?}"),
        }
        assert_eq!(a.calls(), 2);
    }

    #[tokio::test]
    async fn test_complete_json_transport_error_is_not_retried() {
        let a = ScriptedBackend::new(
            "a",
            vec![Err(LlmError::Api {
                status: 500,
                message: "boom".to_string(),
            })],
        );
        let r = router(a.clone(), ScriptedBackend::ok("b", &[]));
        let err = r
            .complete_json(TaskType::PitchGeneration, "p", None, |_: &Vec<String>| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
        assert_eq!(a.calls(), 1);
    }
}
