//! Resume-to-work-experience extraction core for the Vouch verification
//! service.
//!
//! Raw resume text goes in; a prioritized list of remote text-generation
//! backends is tried in order; the winning response is parsed, repaired, and
//! validated into an ordered list of work-experience records.

pub mod config;
pub mod credential;
pub mod pipeline;

pub use config::ExtractorConfig;
pub use pipeline::{
    ExtractError, ExtractionResult, OpenRouterClient, ResumeExtractor, WorkExperienceRecord,
};

/// Convenience entry point: run the full pipeline against OpenRouter.
pub fn extract_work_experience(
    raw_text: &str,
    config: &ExtractorConfig,
) -> Result<ExtractionResult, ExtractError> {
    let client = OpenRouterClient::from_config(config);
    let extractor = ResumeExtractor::new(Box::new(client), config.preferred_model.as_deref());
    extractor.extract(raw_text)
}
