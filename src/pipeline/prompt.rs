use chrono::NaiveDate;

/// Build the extraction prompt for one resume.
///
/// Embeds today's date so the model can reject or reinterpret future dates,
/// and spells out the formatting rules the normalizer relies on (JSON shape,
/// spacing of concatenated tokens, ISO dates).
pub fn build_extraction_prompt(raw_text: &str, today: NaiveDate) -> String {
    let today = today.format("%Y-%m-%d");
    format!(
        r#"You are an expert at extracting work experience information from resumes. Extract ALL work experience entries from the resume text below.

CRITICAL RULES:
1. Dates must be valid and NOT in the future. Today's date is {today}. If a date appears to be in the future, use the most recent valid date instead.
2. Job titles must preserve proper spacing. "Data Engineer" not "DataEngineer", "VP of Technology" not "VPofTechnology".
3. Company names must be complete and properly separated. Do not concatenate multiple words together. "Wilfrid Laurier University" not "WilfridLaurierUniversity" or "Wilfrid Laurier University-VRLaurierWaterloo".
4. If end_date is "Present", "Current", or missing and the role appears ongoing, set end_date to null.
5. Extract dates in YYYY-MM-DD format. If only month/year is given, use the 1st of the month.
6. Only include entries with clear company name, job title, and start date.

EXAMPLE OUTPUT:
{{
  "work_experiences": [
    {{
      "company_name": "Meta",
      "role_title": "Data Engineer",
      "start_date": "2023-09-01",
      "end_date": null,
      "description": "Built data pipelines"
    }},
    {{
      "company_name": "Wilfrid Laurier University",
      "role_title": "VP of Technology",
      "start_date": "2024-05-01",
      "end_date": null
    }}
  ]
}}

Resume text:
{raw_text}

Return ONLY a valid JSON object with the exact structure shown above. No markdown, no explanations, no additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_todays_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let prompt = build_extraction_prompt("some resume", today);
        assert!(prompt.contains("Today's date is 2026-08-30"));
    }

    #[test]
    fn prompt_embeds_resume_text() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let prompt = build_extraction_prompt("Jane Doe\nData Engineer at Meta", today);
        assert!(prompt.contains("Data Engineer at Meta"));
        assert!(prompt.contains("work_experiences"));
    }
}
