use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::classify::BackendFailure;

/// A work-experience entry exactly as the model returned it.
///
/// Untrusted: any field may be missing, empty, or garbled. Validation and
/// repair happen in `normalize`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkExperienceDraft {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated work-experience record ready for storage.
///
/// `start_date` is never later than today; `end_date` is either absent
/// (ongoing role) or not later than today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperienceRecord {
    pub company_name: String,
    pub role_title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Final output of one extraction call. Immutable after creation.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub work_experiences: Vec<WorkExperienceRecord>,
    /// Raw backend response, kept for diagnostics only.
    pub raw_response: String,
}

/// One step of the fallback sequence. Owned by a single orchestration call,
/// logged on exit, never persisted.
#[derive(Debug, Clone)]
pub struct BackendAttempt {
    pub model: String,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Success,
    RetryableFailure(BackendFailure),
    FatalFailure(BackendFailure),
}

/// Remote chat-completion backend abstraction (allows mocking).
///
/// One call issues one synchronous request and returns the raw text content
/// of the completion, or a classified failure.
pub trait ChatBackend {
    fn complete(&self, model: &str, prompt: &str) -> Result<String, BackendFailure>;
}
