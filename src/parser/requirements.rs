use std::mem;
use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use super::page::leading_bold_label;
use super::text::{element_text, normalize};
use crate::record::{RequirementsMap, SectionKey};

/// Checked top to bottom; the first match wins.
static HEADER_RULES: LazyLock<Vec<(Regex, SectionKey)>> = LazyLock::new(|| {
    [
        (r"(?i)^major in\b", SectionKey::MajorIn),
        (r"(?i)\bacs\b.*\bmajor", SectionKey::AcsMajor),
        (r"(?i)^major\s+for\b.*education", SectionKey::MajorForEd),
        (r"(?i)^minor in\b", SectionKey::MinorIn),
        (r"(?i)^grade point average notation", SectionKey::GpaNote),
        (r"(?i)^courses\b", SectionKey::Courses),
    ]
    .into_iter()
    .map(|(pattern, key)| (Regex::new(pattern).unwrap(), key))
    .collect()
});

/// Known section for a bold label, or `None` when nothing in the list matches.
pub fn classify_header(label: &str) -> Option<SectionKey> {
    let label = normalize(label);
    HEADER_RULES
        .iter()
        .find(|(re, _)| re.is_match(&label))
        .map(|(_, key)| key.clone())
}

/// Drop `label` from the front of `text` when it is a literal, case-insensitive
/// prefix, along with one trailing `:`, `.` or `-` and the whitespace around it.
pub fn strip_label(text: &str, label: &str) -> String {
    let text = normalize(text);
    let label = normalize(label);
    if label.is_empty() {
        return text;
    }
    let pattern = format!(r"(?i)^\s*{}\s*[:.-]?\s*", regex::escape(&label));
    match Regex::new(&pattern) {
        Ok(re) => normalize(&re.replace(&text, "")),
        Err(_) => text,
    }
}

/// Current section plus the text collected for it since the last header.
#[derive(Debug, Default)]
pub struct SectionAccumulator {
    current: Option<SectionKey>,
    buffer: Vec<String>,
    result: RequirementsMap,
}

impl SectionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the running section and start `key`.
    pub fn open(&mut self, key: SectionKey) {
        self.flush();
        self.current = Some(key);
    }

    /// Add text to the running section. Ignored while no section is open.
    pub fn push(&mut self, text: String) {
        if self.current.is_some() && !text.is_empty() {
            self.buffer.push(text);
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    fn flush(&mut self) {
        let lines = mem::take(&mut self.buffer);
        let Some(key) = &self.current else {
            return;
        };
        if lines.is_empty() {
            return;
        }
        let text = normalize(&lines.join(" "));
        debug!(section = key.as_str(), chars = text.len(), "flushing requirement section");
        self.result.merge(key, text);
    }

    pub fn finish(mut self) -> RequirementsMap {
        self.flush();
        self.result
    }
}

/// Walk the requirement paragraphs, opening a section at every leading bold label.
pub fn extract(paragraphs: &[ElementRef]) -> RequirementsMap {
    let mut acc = SectionAccumulator::new();

    for p in paragraphs {
        match leading_bold_label(*p) {
            Some(label) => {
                let key = classify_header(&label)
                    .unwrap_or_else(|| SectionKey::Other(normalize(&label)));
                acc.open(key);
                acc.push(strip_label(&element_text(*p), &label));
            }
            None if acc.is_open() => acc.push(element_text(*p)),
            None => {}
        }
    }

    acc.finish()
}

// ── Tests ──
