use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use super::classify::{BackendFailure, FailureKind};
use super::normalize::normalize_response;
use super::prompt::build_extraction_prompt;
use super::types::{AttemptOutcome, BackendAttempt, ChatBackend, ExtractionResult};
use super::ExtractError;

/// Free models tried in order when no preferred model is configured.
/// The Gemini entry stays last.
pub const FALLBACK_MODELS: &[&str] = &[
    "deepseek/deepseek-chat-v3.1:free",
    "deepseek/deepseek-r1-0528-qwen3-8b:free",
    "openai/gpt-oss-20b:free",
    "google/gemini-2.0-flash-exp:free",
];

/// Pause between fallback attempts.
const FALLBACK_DELAY: Duration = Duration::from_millis(500);

/// Remediation hint when every backend rejects the request on
/// data-policy grounds.
pub const POLICY_REMEDIATION: &str = "All models require data policy configuration. \
     Configure your privacy settings at https://openrouter.ai/settings/privacy \
     and enable \"Free model publication\".";

/// Runs the extraction pipeline: prompt → backend fallback loop → normalize.
///
/// The fallback loop is a small ordered state machine over the model list:
/// try one backend, classify the failure, then either fall through or abort.
/// No backend is tried more than once per call.
pub struct ResumeExtractor {
    backend: Box<dyn ChatBackend + Send + Sync>,
    models: Vec<String>,
}

impl ResumeExtractor {
    /// Build an extractor over the default fallback list, with an optional
    /// caller-preferred model prepended.
    pub fn new(
        backend: Box<dyn ChatBackend + Send + Sync>,
        preferred_model: Option<&str>,
    ) -> Self {
        let mut models = Vec::with_capacity(FALLBACK_MODELS.len() + 1);
        if let Some(model) = preferred_model {
            models.push(model.to_string());
        }
        models.extend(FALLBACK_MODELS.iter().map(|m| (*m).to_string()));
        Self { backend, models }
    }

    /// Build an extractor over an explicit model list (tests, custom setups).
    pub fn with_models(backend: Box<dyn ChatBackend + Send + Sync>, models: Vec<String>) -> Self {
        Self { backend, models }
    }

    /// Full pipeline: raw resume text in, validated records out.
    pub fn extract(&self, raw_text: &str) -> Result<ExtractionResult, ExtractError> {
        if raw_text.trim().is_empty() {
            return Err(ExtractError::EmptyInput);
        }

        let today = Local::now().date_naive();
        let raw_response = self.extract_raw(raw_text, today)?;
        let work_experiences = normalize_response(&raw_response, today)?;
        tracing::info!(
            records = work_experiences.len(),
            "resume extraction complete"
        );
        Ok(ExtractionResult {
            work_experiences,
            raw_response,
        })
    }

    /// Try each backend in order until one returns usable content.
    ///
    /// The prompt is built once; each backend gets exactly one request.
    /// The attempt log lives only for the duration of this call.
    pub fn extract_raw(&self, raw_text: &str, today: NaiveDate) -> Result<String, ExtractError> {
        let prompt = build_extraction_prompt(raw_text, today);
        let mut attempts: Vec<BackendAttempt> = Vec::with_capacity(self.models.len());

        for (i, model) in self.models.iter().enumerate() {
            let backends_remain = i + 1 < self.models.len();

            match self.backend.complete(model, &prompt) {
                Ok(content) => {
                    attempts.push(BackendAttempt {
                        model: model.clone(),
                        outcome: AttemptOutcome::Success,
                    });
                    tracing::info!(
                        model = %model,
                        attempt = attempts.len(),
                        "extraction backend succeeded"
                    );
                    return Ok(content);
                }
                Err(failure) if failure.kind.is_retryable() && backends_remain => {
                    tracing::warn!(
                        model = %model,
                        kind = %failure.kind,
                        detail = %failure.detail,
                        "backend failed, falling through"
                    );
                    attempts.push(BackendAttempt {
                        model: model.clone(),
                        outcome: AttemptOutcome::RetryableFailure(failure),
                    });
                    thread::sleep(FALLBACK_DELAY);
                }
                Err(failure) => {
                    tracing::warn!(
                        model = %model,
                        kind = %failure.kind,
                        detail = %failure.detail,
                        "backend failed, aborting"
                    );
                    attempts.push(BackendAttempt {
                        model: model.clone(),
                        outcome: AttemptOutcome::FatalFailure(failure.clone()),
                    });
                    tracing::debug!(?attempts, "backend attempt sequence");
                    return Err(terminal_error(failure));
                }
            }
        }

        // Reached only with an empty model list; a populated list always
        // aborts on its last failure above.
        Err(ExtractError::AllBackendsFailed {
            reason: FailureKind::Unclassified,
            detail: "no extraction backends configured".into(),
        })
    }
}

/// Map the last observed failure to the caller-facing error. A terminal
/// policy-blocked failure gets the remediation hint instead of the raw
/// provider text.
fn terminal_error(failure: BackendFailure) -> ExtractError {
    let detail = match failure.kind {
        FailureKind::PolicyBlocked => POLICY_REMEDIATION.to_string(),
        _ => failure.detail,
    };
    ExtractError::AllBackendsFailed {
        reason: failure.kind,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::pipeline::openrouter::MockChatBackend;

    /// Mock backend with one scripted outcome per call, recording the
    /// models it was asked for.
    struct ScriptedBackend {
        script: Mutex<Vec<Result<String, BackendFailure>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<String, BackendFailure>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChatBackend for ScriptedBackend {
        fn complete(&self, model: &str, _prompt: &str) -> Result<String, BackendFailure> {
            self.calls.lock().unwrap().push(model.to_string());
            let mut script = self.script.lock().unwrap();
            assert!(!script.is_empty(), "backend called more times than scripted");
            script.remove(0)
        }
    }

    // Lets a test keep a handle on the backend after moving it into the
    // extractor.
    impl ChatBackend for Arc<ScriptedBackend> {
        fn complete(&self, model: &str, prompt: &str) -> Result<String, BackendFailure> {
            self.as_ref().complete(model, prompt)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    fn valid_envelope() -> String {
        r#"{"work_experiences": [{"company_name": "Meta", "role_title": "Data Engineer", "start_date": "2023-09-01", "end_date": null}]}"#
            .to_string()
    }

    fn rate_limited() -> BackendFailure {
        BackendFailure::new(FailureKind::RateLimited, "HTTP 429: rate limit exceeded")
    }

    fn policy_blocked() -> BackendFailure {
        BackendFailure::new(
            FailureKind::PolicyBlocked,
            "No endpoints found matching your data policy",
        )
    }

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|m| (*m).to_string()).collect()
    }

    #[test]
    fn preferred_model_is_prepended() {
        let extractor =
            ResumeExtractor::new(Box::new(MockChatBackend::new("{}")), Some("custom/model"));
        assert_eq!(extractor.models[0], "custom/model");
        assert_eq!(extractor.models.len(), FALLBACK_MODELS.len() + 1);
    }

    #[test]
    fn no_preferred_model_uses_default_list() {
        let extractor = ResumeExtractor::new(Box::new(MockChatBackend::new("{}")), None);
        assert_eq!(extractor.models, FALLBACK_MODELS);
    }

    #[test]
    fn second_backend_success_skips_the_rest() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Err(rate_limited()),
            Ok(valid_envelope()),
        ]));
        let extractor = ResumeExtractor::with_models(
            Box::new(Arc::clone(&backend)),
            models(&["model-a", "model-b", "model-c"]),
        );

        let raw = extractor.extract_raw("resume text", today()).unwrap();
        assert!(raw.contains("Meta"));
        assert_eq!(backend.calls(), vec!["model-a", "model-b"]);
    }

    #[test]
    fn all_policy_blocked_yields_remediation_message() {
        let backend = ScriptedBackend::new(vec![
            Err(policy_blocked()),
            Err(policy_blocked()),
            Err(policy_blocked()),
        ]);
        let extractor = ResumeExtractor::with_models(
            Box::new(backend),
            models(&["model-a", "model-b", "model-c"]),
        );

        let err = extractor.extract_raw("resume text", today()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("privacy settings"));
        assert!(!message.contains("No endpoints found"));
        assert!(matches!(
            err,
            ExtractError::AllBackendsFailed {
                reason: FailureKind::PolicyBlocked,
                ..
            }
        ));
    }

    #[test]
    fn authentication_failure_aborts_immediately() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(BackendFailure::new(
            FailureKind::Authentication,
            "invalid API key; check OPENROUTER_API_KEY",
        ))]));
        let extractor = ResumeExtractor::with_models(
            Box::new(Arc::clone(&backend)),
            models(&["model-a", "model-b"]),
        );

        let err = extractor.extract_raw("resume text", today()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::AllBackendsFailed {
                reason: FailureKind::Authentication,
                ..
            }
        ));
        assert_eq!(backend.calls(), vec!["model-a"]);
    }

    #[test]
    fn unclassified_failure_aborts_immediately() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(BackendFailure::new(
            FailureKind::Unclassified,
            "internal server error",
        ))]));
        let extractor = ResumeExtractor::with_models(
            Box::new(Arc::clone(&backend)),
            models(&["model-a", "model-b"]),
        );

        let err = extractor.extract_raw("resume text", today()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::AllBackendsFailed {
                reason: FailureKind::Unclassified,
                ..
            }
        ));
        assert_eq!(backend.calls(), vec!["model-a"]);
    }

    #[test]
    fn retryable_failure_on_last_backend_aborts() {
        let backend = ScriptedBackend::new(vec![Err(rate_limited()), Err(rate_limited())]);
        let extractor =
            ResumeExtractor::with_models(Box::new(backend), models(&["model-a", "model-b"]));

        let err = extractor.extract_raw("resume text", today()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::AllBackendsFailed {
                reason: FailureKind::RateLimited,
                ..
            }
        ));
    }

    #[test]
    fn empty_input_rejected_before_any_backend() {
        let backend = ScriptedBackend::new(vec![]);
        let extractor = ResumeExtractor::with_models(Box::new(backend), models(&["model-a"]));
        let err = extractor.extract("   ").unwrap_err();
        assert!(matches!(err, ExtractError::EmptyInput));
    }

    #[test]
    fn extract_normalizes_the_winning_response() {
        let fenced = format!("```json\n{}\n```", valid_envelope());
        let extractor = ResumeExtractor::with_models(
            Box::new(MockChatBackend::new(&fenced)),
            models(&["model-a"]),
        );

        let result = extractor.extract("resume text").unwrap();
        assert_eq!(result.work_experiences.len(), 1);
        assert_eq!(result.work_experiences[0].company_name, "Meta");
        assert!(result.work_experiences[0].end_date.is_none());
        assert!(result.raw_response.contains("```json"));
    }

    #[test]
    fn unparseable_success_is_malformed_response() {
        let extractor = ResumeExtractor::with_models(
            Box::new(MockChatBackend::new("I could not find any JSON to give you.")),
            models(&["model-a"]),
        );
        let err = extractor.extract("resume text").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse(_)));
    }
}
