//! Course codes and credit counts inside requirement text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{2,4})[-\s]?(\d{3})").unwrap());
static CODE_ANY_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([A-Z]{2,4})[-\s]?(\d{3})").unwrap());
// "ACCT-200 or 201"
static OR_SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{2,4})[-\s]?(\d{3})\s+or\s+(\d{3})").unwrap());
static CREDITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s+credits?\s+including").unwrap());

/// "acct-321" / "ACCT321" -> "ACCT 321". Text without a code is upper-cased as is.
pub fn normalize_code(code: &str) -> String {
    let trimmed = super::text::normalize(code);
    match CODE_ANY_CASE_RE.captures(&trimmed) {
        Some(caps) => format!("{} {}", caps[1].to_uppercase(), &caps[2]),
        None => trimmed.to_uppercase(),
    }
}

/// Every course code in `text`, normalized, in order of first mention.
pub fn course_codes(text: &str) -> Vec<String> {
    let expanded = OR_SHORTHAND_RE.replace_all(text, "$1-$2, $1-$3");
    let mut seen = HashSet::new();
    CODE_RE
        .find_iter(&expanded)
        .map(|m| normalize_code(m.as_str()))
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

pub fn credits_required(text: &str) -> Option<u32> {
    CREDITS_RE.captures(text)?[1].parse().ok()
}
