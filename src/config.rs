use std::env;

use crate::pipeline::ExtractError;

/// Attribution title sent with every backend request.
pub const APP_TITLE: &str = "Vouch - Resume Verification";

/// Default originating-site URL for the attribution headers.
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Configuration surface for the extraction pipeline.
///
/// Only the API key is required; the preferred model and site URL are
/// optional overrides. The site URL is used solely for request attribution
/// headers, never for behavior.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub api_key: String,
    pub preferred_model: Option<String>,
    pub site_url: String,
}

impl ExtractorConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            preferred_model: None,
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }

    pub fn with_preferred_model(mut self, model: &str) -> Self {
        self.preferred_model = Some(model.to_string());
        self
    }

    pub fn with_site_url(mut self, url: &str) -> Self {
        self.site_url = url.to_string();
        self
    }

    /// Load configuration from the environment.
    ///
    /// `OPENROUTER_API_KEY` is required; a missing or blank key fails
    /// immediately, before any backend is attempted. `OPENROUTER_MODEL`
    /// and `VOUCH_SITE_URL` are optional.
    pub fn from_env() -> Result<Self, ExtractError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ExtractError::Configuration("OPENROUTER_API_KEY".into()))?;

        Ok(Self {
            api_key,
            preferred_model: env::var("OPENROUTER_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty()),
            site_url: env::var("VOUCH_SITE_URL")
                .ok()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
        })
    }
}
