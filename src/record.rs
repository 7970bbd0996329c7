use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parser::codes;
use crate::parser::courses::{parse_course_list, CourseList};

/// Everything extracted from one program page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub program_title: Option<String>,
    pub catalog_year: Option<String>,
    pub page_url: Option<String>,
    pub faculty: Vec<FacultyEntry>,
    pub requirements: RequirementsMap,
    pub courses_endpoint: Option<String>,
    pub courses_html: Option<String>,
}

impl ProgramRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Courses parsed out of `courses_html`; `None` when nothing was fetched.
    /// The stored HTML itself stays untouched.
    pub fn course_list(&self) -> Option<CourseList> {
        self.courses_html.as_deref().map(parse_course_list)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyEntry {
    pub name: String,
    pub title: Option<String>,
    pub degrees: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsMap {
    pub major_in: Option<String>,
    pub acs_major: Option<String>,
    pub major_for_ed: Option<String>,
    pub minor_in: Option<String>,
    pub gpa_note: Option<String>,
    pub other_sections: BTreeMap<String, String>,
}

/// Where a requirement section's text ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKey {
    MajorIn,
    AcsMajor,
    MajorForEd,
    MinorIn,
    GpaNote,
    /// Catch-all for "Courses ..." labels, stored as `courses_hdr` so it
    /// cannot collide with a page section literally labeled "courses".
    Courses,
    /// Unrecognized label, keyed by its normalized text.
    Other(String),
}

impl SectionKey {
    pub fn as_str(&self) -> &str {
        match self {
            SectionKey::MajorIn => "major_in",
            SectionKey::AcsMajor => "acs_major",
            SectionKey::MajorForEd => "major_for_ed",
            SectionKey::MinorIn => "minor_in",
            SectionKey::GpaNote => "gpa_note",
            SectionKey::Courses => "courses_hdr",
            SectionKey::Other(label) => label,
        }
    }
}

impl RequirementsMap {
    /// Store `text` under `key`, appending with one space if the key already has text.
    pub fn merge(&mut self, key: &SectionKey, text: String) {
        let slot = match key {
            SectionKey::MajorIn => &mut self.major_in,
            SectionKey::AcsMajor => &mut self.acs_major,
            SectionKey::MajorForEd => &mut self.major_for_ed,
            SectionKey::MinorIn => &mut self.minor_in,
            SectionKey::GpaNote => &mut self.gpa_note,
            SectionKey::Courses | SectionKey::Other(_) => {
                let existing = self
                    .other_sections
                    .entry(key.as_str().to_string())
                    .or_default();
                append(existing, &text);
                return;
            }
        };
        match slot {
            Some(existing) => append(existing, &text),
            None => *slot = Some(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.major_in.is_none()
            && self.acs_major.is_none()
            && self.major_for_ed.is_none()
            && self.minor_in.is_none()
            && self.gpa_note.is_none()
            && self.other_sections.is_empty()
    }

    /// Course codes named in the major requirements, in order of first mention.
    pub fn major_course_codes(&self) -> Vec<String> {
        self.major_in
            .as_deref()
            .map(codes::course_codes)
            .unwrap_or_default()
    }

    /// "32 credits including ..." in the major requirements.
    pub fn major_credits(&self) -> Option<u32> {
        self.major_in.as_deref().and_then(codes::credits_required)
    }
}

fn append(existing: &mut String, text: &str) {
    if !existing.is_empty() {
        existing.push(' ');
    }
    existing.push_str(text);
}

// ── Tests ──
