use std::fmt;

/// Message tokens that mark a rate-limit or quota failure.
const RATE_LIMIT_TOKENS: &[&str] = &["rate limit", "quota", "too many requests", "429"];

/// Message tokens that mark a data-policy rejection.
const POLICY_TOKENS: &[&str] = &["data policy", "privacy", "no endpoints found"];

/// Classified outcome of a failed backend attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 429/402 or a rate-limit/quota message. Fall through to the next backend.
    RateLimited,
    /// Provider rejected the request on data-policy grounds. Fall through.
    PolicyBlocked,
    /// HTTP 401. Never retried.
    Authentication,
    /// Anything else, including a malformed envelope or empty content. Never retried.
    Unclassified,
}

impl FailureKind {
    /// Whether the fallback loop may continue to the next backend.
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureKind::RateLimited | FailureKind::PolicyBlocked)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::RateLimited => "rate limited",
            FailureKind::PolicyBlocked => "policy blocked",
            FailureKind::Authentication => "authentication",
            FailureKind::Unclassified => "unclassified",
        };
        f.write_str(s)
    }
}

/// A classified failure from one backend attempt.
#[derive(Debug, Clone)]
pub struct BackendFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl BackendFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Classify a backend failure from the HTTP status (if any) and the
/// human-readable provider message.
///
/// Status takes precedence over message matching; the message rules are
/// substring matches against provider error text and are kept here, in one
/// place, so they can evolve without touching the HTTP code.
pub fn classify_failure(status: Option<u16>, message: &str) -> FailureKind {
    match status {
        Some(429) | Some(402) => return FailureKind::RateLimited,
        Some(401) => return FailureKind::Authentication,
        _ => {}
    }

    let lower = message.to_lowercase();
    if RATE_LIMIT_TOKENS.iter().any(|t| lower.contains(t)) {
        FailureKind::RateLimited
    } else if POLICY_TOKENS.iter().any(|t| lower.contains(t)) {
        FailureKind::PolicyBlocked
    } else {
        FailureKind::Unclassified
    }
}
