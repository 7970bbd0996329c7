use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Node};

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "tr", "td", "th", "dt", "dd", "h1", "h2", "h3", "h4", "h5", "h6",
    "section", "article", "table", "ul", "ol", "dl",
];
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript"];

static CATALOG_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(20\d{2}-\d{2})\s*catalog\b").unwrap());

/// Collapse whitespace runs to a single space and trim.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize).unwrap_or_default()
}

/// `Some("2023-24")` for text like "2023-24 Catalog".
pub fn catalog_year(text: &str) -> Option<String> {
    CATALOG_YEAR_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// All text under `el`, text nodes joined with a space, normalized.
pub fn element_text(el: ElementRef) -> String {
    normalize(&el.text().collect::<Vec<_>>().join(" "))
}

/// Lines of `el` where only `<br>` breaks a line; source newlines are plain spaces.
pub fn element_lines(el: ElementRef) -> Vec<String> {
    let mut out = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(t) => {
                out.extend(t.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            Node::Element(e) if e.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out.split('\n')
        .map(normalize)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Lines of `el` broken at `<br>` and at the start of every block element.
/// Text inside `script`/`style` is left out.
pub fn block_lines(el: ElementRef) -> Vec<String> {
    let mut out = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(t) => {
                let skipped = node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .is_some_and(|parent| SKIPPED_TAGS.contains(&parent.value().name()));
                if !skipped {
                    out.extend(t.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
                }
            }
            Node::Element(e) if e.name() == "br" || BLOCK_TAGS.contains(&e.name()) => {
                out.push('\n')
            }
            _ => {}
        }
    }
    out.split('\n')
        .map(normalize)
        .filter(|l| !l.is_empty())
        .collect()
}

// ── Tests ──
