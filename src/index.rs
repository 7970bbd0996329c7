//! Areas-of-study index: the listing page that links to every program page.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

static AREA_TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.area-list__title").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static AREA_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/academics/areas-of-study/([^/]+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    Major,
    Minor,
    Coordinated,
    Advising,
}

impl ProgramKind {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(ProgramKind::Major),
            '~' => Some(ProgramKind::Minor),
            '#' => Some(ProgramKind::Coordinated),
            '*' => Some(ProgramKind::Advising),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaEntry {
    pub name: String,
    pub url: String,
    pub kind: Option<ProgramKind>,
}

/// One entry per distinct program name, in page order.
pub fn parse_index(html: &str, root_url: &str) -> Vec<AreaEntry> {
    let base = match Url::parse(root_url) {
        Ok(u) => u,
        Err(e) => {
            warn!(root_url, error = %e, "invalid index root url");
            return Vec::new();
        }
    };

    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for h2 in doc.select(&AREA_TITLE_SEL) {
        let Some(anchor) = h2.select(&ANCHOR_SEL).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !AREA_HREF_RE.is_match(href) {
            continue;
        }
        let name = anchor.text().collect::<String>().trim().to_string();
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }
        let Ok(url) = base.join(href) else {
            continue;
        };
        let kind = h2.text().flat_map(str::chars).find_map(ProgramKind::from_symbol);

        entries.push(AreaEntry {
            name,
            url: url.to_string(),
            kind,
        });
    }

    debug!(count = entries.len(), "parsed areas-of-study index");
    entries
}

/// The program's course listing lives under `<program>/courses`.
pub fn courses_page_url(program_url: &str) -> String {
    format!("{}/courses", program_url.trim_end_matches('/'))
}
