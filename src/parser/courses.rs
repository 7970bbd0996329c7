//! Course entries and prerequisite hints from a fetched course-list page.
//!
//! The page is rendered to lines first (one per block element or `<br>`), so
//! no pattern here ever sees markup.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codes::{course_codes, normalize_code};
use super::text::block_lines;

// "CHEM-121 General Chemistry I (4 credits, Q)"
static COURSE_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{2,4})[-\s]?(\d{3})\s+([^(]+?)\s*\((?i:(\d+)\s+credits?)([^)]*)\)").unwrap()
});
// "CHEM-450. Senior Inquiry. 2 credits."
static LEADING_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,4})[-\s]?(\d{3})\b").unwrap());
static LOOSE_CREDITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(?\s*(\d+)\s+credits?\s*\)?").unwrap());
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{2,4})[-\s]?(\d{3})").unwrap());
static PREREQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)prerequisites?[:\s]+([^.\n]+)").unwrap());
static QUANTITATIVE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bQ\b").unwrap());
static SPEAKING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bSI\b").unwrap());

/// How far back (in bytes) a prerequisite statement looks for the course it belongs to.
const PREREQ_OWNER_WINDOW: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAttrs {
    #[serde(rename = "Q")]
    pub quantitative: bool,
    #[serde(rename = "SI")]
    pub speaking_intensive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCourse {
    pub code: String,
    pub title: String,
    pub credits: u32,
    pub attrs: CourseAttrs,
}

/// `code` lists `requires` as prerequisites (any of them, in mention order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqHint {
    pub code: String,
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseList {
    pub courses: Vec<ParsedCourse>,
    pub prereq_hints: Vec<PrereqHint>,
}

/// Courses (first mention of each code wins) and prerequisite hints.
/// Anything that is not course-list HTML, such as a fetch-failure comment,
/// yields an empty list.
pub fn parse_course_list(html: &str) -> CourseList {
    let doc = Html::parse_document(html);
    let lines = block_lines(doc.root_element());

    let mut seen = HashSet::new();
    let mut courses = Vec::new();
    for line in &lines {
        for course in courses_in_line(line) {
            if seen.insert(course.code.clone()) {
                courses.push(course);
            }
        }
    }
    for line in &lines {
        if let Some(course) = loose_course(line).filter(|c| !seen.contains(&c.code)) {
            seen.insert(course.code.clone());
            courses.push(course);
        }
    }

    let prereq_hints = prereq_hints(&lines.join("\n"));
    debug!(
        courses = courses.len(),
        prereq_hints = prereq_hints.len(),
        "parsed course list"
    );
    CourseList {
        courses,
        prereq_hints,
    }
}

fn courses_in_line(line: &str) -> Vec<ParsedCourse> {
    COURSE_ENTRY_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let credits = caps[4].parse().ok()?;
            // Parenthetical extras plus whatever trails the entry on its line.
            let attr_text = format!("{} {}", &caps[5], &line[whole.end()..]);
            Some(ParsedCourse {
                code: normalize_code(&format!("{} {}", &caps[1], &caps[2])),
                title: clean_title(&caps[3]),
                credits,
                attrs: attrs_in(&attr_text),
            })
        })
        .collect()
}

/// A line that starts with a code and mentions credits later on, without the
/// "Title (N credits)" shape.
fn loose_course(line: &str) -> Option<ParsedCourse> {
    let code = LEADING_CODE_RE.captures(line)?;
    let code_end = code.get(0)?.end();
    let credits = LOOSE_CREDITS_RE.captures(&line[code_end..])?;
    let credits_at = code_end + credits.get(0)?.start();

    let title = clean_title(&line[code_end..credits_at]);
    if title.is_empty() {
        return None;
    }
    Some(ParsedCourse {
        code: normalize_code(&format!("{} {}", &code[1], &code[2])),
        title,
        credits: credits[1].parse().ok()?,
        attrs: attrs_in(&line[credits_at..]),
    })
}

fn clean_title(raw: &str) -> String {
    super::text::normalize(raw)
        .trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '-') || c.is_whitespace())
        .to_string()
}

fn attrs_in(text: &str) -> CourseAttrs {
    CourseAttrs {
        quantitative: QUANTITATIVE_RE.is_match(text),
        speaking_intensive: SPEAKING_RE.is_match(text),
    }
}

/// Each "Prerequisite: ..." statement belongs to the last course code
/// mentioned shortly before it.
fn prereq_hints(text: &str) -> Vec<PrereqHint> {
    PREREQ_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let at = caps.get(0)?.start();
            let window_start = at.saturating_sub(PREREQ_OWNER_WINDOW);
            let owner = CODE_RE
                .find_iter(&text[..at])
                .filter(|m| m.start() >= window_start)
                .last()?;
            let requires = parse_prereq_text(&caps[1]);
            if requires.is_empty() {
                return None;
            }
            Some(PrereqHint {
                code: normalize_code(owner.as_str()),
                requires,
            })
        })
        .collect()
}

/// Course codes named in a prerequisite statement, "ACCT-200 or 201" expanded.
pub fn parse_prereq_text(text: &str) -> Vec<String> {
    course_codes(text)
}

// ── Tests ──
