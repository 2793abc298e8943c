use serde::{Deserialize, Serialize};

use super::classify::{classify_failure, BackendFailure, FailureKind};
use super::types::ChatBackend;
use crate::config::{ExtractorConfig, APP_TITLE};

/// OpenRouter chat-completions endpoint.
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Per-request timeout. Free-tier models can be slow to schedule.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// HTTP client for OpenRouter-hosted text-generation backends.
///
/// One `complete` call issues one synchronous request carrying a single
/// user-role message and maps every failure through `classify_failure`.
pub struct OpenRouterClient {
    api_url: String,
    api_key: String,
    site_url: String,
    client: reqwest::blocking::Client,
}

impl OpenRouterClient {
    pub fn new(api_url: &str, api_key: &str, site_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            site_url: site_url.to_string(),
            client,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(
            OPENROUTER_API_URL,
            &config.api_key,
            &config.site_url,
            REQUEST_TIMEOUT_SECS,
        )
    }
}

/// Request body for the chat-completions endpoint.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response envelope: either a completion or an error object.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ApiError {
    fn detail(&self) -> String {
        if let Some(msg) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return msg.to_string();
        }
        match &self.code {
            Some(code) => code.to_string(),
            None => "provider returned an unspecified error".to_string(),
        }
    }
}

/// Pull a provider error message out of a non-2xx body, which is usually
/// `{"error": {"message": ...}}` but sometimes plain text.
fn error_body_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ApiError,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.detail(),
        Err(_) => body.trim().to_string(),
    }
}

impl ChatBackend for OpenRouterClient {
    fn complete(&self, model: &str, prompt: &str) -> Result<String, BackendFailure> {
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .map_err(|e| {
                let detail = if e.is_connect() {
                    format!("cannot reach {}", self.api_url)
                } else if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                };
                BackendFailure::new(FailureKind::Unclassified, detail)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let kind = classify_failure(Some(status.as_u16()), &body);
            let detail = match kind {
                // The raw provider text adds nothing here; point at the key.
                FailureKind::Authentication => {
                    "invalid API key; check OPENROUTER_API_KEY".to_string()
                }
                _ => format!("HTTP {}: {}", status.as_u16(), error_body_detail(&body)),
            };
            return Err(BackendFailure::new(kind, detail));
        }

        let parsed: ChatResponse = response.json().map_err(|e| {
            BackendFailure::new(
                FailureKind::Unclassified,
                format!("malformed response envelope: {e}"),
            )
        })?;

        // Providers report some failures inside a 200 envelope.
        if let Some(error) = parsed.error {
            let detail = error.detail();
            let kind = classify_failure(None, &detail);
            return Err(BackendFailure::new(kind, detail));
        }

        match parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
        {
            Some(content) => Ok(content),
            None => Err(BackendFailure::new(
                FailureKind::Unclassified,
                "no content returned from backend",
            )),
        }
    }
}

/// Mock backend for testing; returns a fixed response for every model.
pub struct MockChatBackend {
    response: String,
}

impl MockChatBackend {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl ChatBackend for MockChatBackend {
    fn complete(&self, _model: &str, _prompt: &str) -> Result<String, BackendFailure> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_backend_returns_configured_response() {
        let backend = MockChatBackend::new("raw output");
        assert_eq!(backend.complete("any-model", "prompt").unwrap(), "raw output");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OpenRouterClient::new("https://example.test/api/", "key", "http://localhost:3000", 5);
        assert_eq!(client.api_url, "https://example.test/api");
    }

    #[test]
    fn error_body_detail_prefers_provider_message() {
        let body = r#"{"error": {"message": "Rate limit exceeded", "code": 429}}"#;
        assert_eq!(error_body_detail(body), "Rate limit exceeded");
    }

    #[test]
    fn error_body_detail_falls_back_to_code() {
        let body = r#"{"error": {"code": "model_not_found"}}"#;
        assert_eq!(error_body_detail(body), "\"model_not_found\"");
    }

    #[test]
    fn error_body_detail_passes_plain_text_through() {
        assert_eq!(error_body_detail("upstream exploded"), "upstream exploded");
    }

    #[test]
    fn envelope_with_error_object_parses() {
        let raw = r#"{"error": {"message": "No endpoints found matching your data policy"}}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.error.unwrap().detail(),
            "No endpoints found matching your data policy"
        );
    }

    #[test]
    fn envelope_with_completion_parses() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "{}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{}")
        );
        assert!(parsed.error.is_none());
    }
}
