// Lossy text-repair heuristics for model-garbled company names and role
// titles. Each rule is a pure function over strings so its edge cases can be
// pinned down in isolation; thresholds are deliberate and tested.

use std::sync::LazyLock;

use regex::Regex;

/// Lowercase letter followed by an uppercase-then-lowercase pair, e.g. the
/// "dL" in "WilfridLaurier". The trailing lowercase requirement keeps
/// acronyms like "VRLaurier" from being split inside the acronym.
static COMPANY_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z][a-z])").unwrap());

/// Any lowercase-to-uppercase boundary, e.g. the "aE" in "DataEngineer".
static TITLE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// A run of two-or-more uppercase letters glued to "of"/"Of" and the next
/// capitalized word, e.g. "VPofTechnology".
static UPPER_RUN_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{2,})(?:of|Of)([A-Z])").unwrap());

/// Trim concatenation artifacts out of a hyphen-joined company name.
///
/// Names with more than two hyphen segments are assumed to be concatenated
/// ("Company-Division-Campus-Team"). Prefer the first segment when it already
/// contains a space and is longer than five characters; otherwise join the
/// first two segments when the result is longer than five characters; else
/// fall back to the first segment alone. Two-segment names pass through
/// untouched so legitimate hyphenated names survive.
pub fn trim_concatenated_company(name: &str) -> String {
    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() <= 2 {
        return name.to_string();
    }

    let first = parts[0].trim();
    let second = parts[1].trim();
    if first.contains(' ') && first.len() > 5 {
        first.to_string()
    } else if !second.is_empty() && first.len() + 1 + second.len() > 5 {
        format!("{first} {second}")
    } else {
        first.to_string()
    }
}

/// Restore lost spacing in a company name: "WilfridLaurierUniversity" ->
/// "Wilfrid Laurier University". Acronym runs are preserved.
pub fn respace_company_name(name: &str) -> String {
    COMPANY_BOUNDARY.replace_all(name, "${1} ${2}").into_owned()
}

/// Restore lost spacing in a role title: "DataEngineer" -> "Data Engineer",
/// "VPofTechnology" -> "VP of Technology".
///
/// The "of" rule runs first so the acronym run is still glued to the
/// following word when it fires.
pub fn respace_role_title(title: &str) -> String {
    let title = UPPER_RUN_OF.replace_all(title, "${1} of ${2}");
    TITLE_BOUNDARY.replace_all(&title, "${1} ${2}").into_owned()
}
