use serde_json::Value;

use super::types::WorkExperienceDraft;
use super::ExtractError;

/// Strip surrounding triple-backtick fences, with or without a language tag.
///
/// Models sometimes wrap the JSON in ```` ```json ... ``` ```` despite being
/// told not to; structural parsing runs on the inner text.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json").or_else(|| s.strip_prefix("```")) {
        s = rest.trim_start();
        if let Some(body) = s.strip_suffix("```") {
            s = body.trim_end();
        }
    }
    s
}

/// Parse a raw model response into untrusted drafts.
///
/// Fails only when the envelope itself is unusable: not JSON, or the
/// `work_experiences` field is absent or not an array. Individual entries
/// that fail to deserialize are dropped, never fatal.
pub fn parse_response_envelope(raw: &str) -> Result<Vec<WorkExperienceDraft>, ExtractError> {
    let json = strip_code_fences(raw);
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ExtractError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let Some(entries) = value.get("work_experiences").and_then(Value::as_array) else {
        return Err(ExtractError::MalformedResponse(
            "missing work_experiences array".into(),
        ));
    };

    Ok(parse_entries_lenient(entries))
}

/// Deserialize entries leniently, skipping any that do not fit the draft shape.
fn parse_entries_lenient(entries: &[Value]) -> Vec<WorkExperienceDraft> {
    let mut drafts = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<WorkExperienceDraft>(entry.clone()) {
            Ok(draft) => drafts.push(draft),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed work experience entry");
            }
        }
    }
    drafts
}
