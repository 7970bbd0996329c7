use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::text::{element_lines, normalize};
use crate::record::FacultyEntry;

static CAPS_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z'.-]*$").unwrap());

/// One entry per paragraph that has any text, in paragraph order.
pub fn extract(paragraphs: &[ElementRef]) -> Vec<FacultyEntry> {
    paragraphs
        .iter()
        .filter_map(|p| parse_lines(element_lines(*p).as_slice()))
        .collect()
}

/// "NAME, Title" then degrees; anything past the second line is ignored.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Option<FacultyEntry> {
    let first = lines.first()?.as_ref();
    let degrees = lines.get(1).map(|l| normalize(l.as_ref()));

    let (name, title) = match first.split_once(',') {
        Some((name, title)) => (normalize(name), Some(normalize(title))),
        None => split_caps_name(first),
    };

    Some(FacultyEntry {
        name,
        title: title.filter(|t| !t.is_empty()),
        degrees: degrees.filter(|d| !d.is_empty()),
    })
}

/// Best effort for lines without a comma: the first run of all-caps tokens with at
/// least two letters is the name and the rest of the line is the title. Shorter runs
/// ("I", "A") are skipped. No qualifying run means the whole line is the name.
fn split_caps_name(line: &str) -> (String, Option<String>) {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let is_caps = |t: &str| CAPS_TOKEN_RE.is_match(t.trim_end_matches(','));

    let mut start = 0;
    while start < tokens.len() {
        if !is_caps(tokens[start]) {
            start += 1;
            continue;
        }
        let len = tokens[start..].iter().take_while(|t| is_caps(t)).count();
        let run = &tokens[start..start + len];
        let letters: usize = run
            .iter()
            .map(|t| t.chars().filter(char::is_ascii_alphabetic).count())
            .sum();
        if letters >= 2 {
            return name_and_rest(&tokens, start, len);
        }
        start += len;
    }

    (normalize(line), None)
}

fn name_and_rest(tokens: &[&str], start: usize, len: usize) -> (String, Option<String>) {
    let name = tokens[start..start + len]
        .join(" ")
        .trim_end_matches(',')
        .to_string();
    let rest = tokens[..start]
        .iter()
        .chain(&tokens[start + len..])
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let title = rest.trim_matches(|c: char| c == ',' || c.is_whitespace());

    (name, Some(title.to_string()))
}

// ── Tests ──
