use chrono::NaiveDate;

use super::parser::parse_response_envelope;
use super::repair::{respace_company_name, respace_role_title, trim_concatenated_company};
use super::types::{WorkExperienceDraft, WorkExperienceRecord};
use super::ExtractError;

/// Full-date formats the models commonly emit besides ISO.
const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Month-granularity formats; these resolve to the first of the month.
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%m/%Y", "%B %Y", "%b %Y"];

/// Turn a raw model response into validated records.
///
/// Fails with `MalformedResponse` only when the envelope itself cannot be
/// parsed; defective individual entries are dropped.
pub fn normalize_response(
    raw: &str,
    today: NaiveDate,
) -> Result<Vec<WorkExperienceRecord>, ExtractError> {
    let drafts = parse_response_envelope(raw)?;
    Ok(normalize_drafts(drafts, today))
}

/// Validate and repair drafts, preserving their original relative order.
pub fn normalize_drafts(
    drafts: Vec<WorkExperienceDraft>,
    today: NaiveDate,
) -> Vec<WorkExperienceRecord> {
    let total = drafts.len();
    let records: Vec<WorkExperienceRecord> = drafts
        .into_iter()
        .filter_map(|draft| normalize_entry(draft, today))
        .collect();

    if records.len() < total {
        tracing::debug!(
            kept = records.len(),
            dropped = total - records.len(),
            "dropped defective work experience entries"
        );
    }
    records
}

fn normalize_entry(draft: WorkExperienceDraft, today: NaiveDate) -> Option<WorkExperienceRecord> {
    // Required fields: drop the entry, never fail the call.
    let company = non_empty(draft.company_name.as_deref())?;
    let title = non_empty(draft.role_title.as_deref())?;
    let start_raw = non_empty(draft.start_date.as_deref())?;

    let company_name = respace_company_name(&trim_concatenated_company(company));
    let role_title = respace_role_title(title);

    let start_date = normalize_date(start_raw)?;
    if start_date > today {
        tracing::debug!(company = %company_name, %start_date, "dropping entry with future start date");
        return None;
    }

    // A future end date means the role is ongoing: clear it, keep the entry.
    let end_date = draft
        .end_date
        .as_deref()
        .and_then(normalize_date)
        .filter(|end| *end <= today);

    Some(WorkExperienceRecord {
        company_name,
        role_title,
        start_date,
        end_date,
        description: draft
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize a loosely formatted date string.
///
/// ISO dates pass through; "present"/"current"/"null"/empty mean absent;
/// other recognized formats are reparsed; anything else maps to absent.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if matches!(lower.as_str(), "present" | "current" | "null") {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    for fmt in MONTH_FORMATS {
        let with_day = format!("{trimmed} 1");
        let fmt_with_day = format!("{fmt} %d");
        if let Ok(d) = NaiveDate::parse_from_str(&with_day, &fmt_with_day) {
            return Some(d);
        }
    }
    // Bare year resolves to January 1st.
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let with_day = format!("{trimmed} 1 1");
        if let Ok(d) = NaiveDate::parse_from_str(&with_day, "%Y %m %d") {
            return Some(d);
        }
    }
    None
}
