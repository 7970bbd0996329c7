pub mod codes;
pub mod courses;
pub mod faculty;
pub mod page;
pub mod requirements;
pub mod text;

use scraper::Html;
use tracing::{debug, info};

use crate::fetch;
use crate::record::ProgramRecord;
use crate::settings::Settings;

/// Parse with default settings; the course list is never fetched.
pub fn parse_program_page(html: &str, page_url: Option<&str>) -> ProgramRecord {
    extract_program(html, page_url, &Settings::default())
}

/// Pipeline: title/year → preface vs requirements → faculty, requirements →
/// courses endpoint (and optionally its HTML).
pub fn extract_program(html: &str, page_url: Option<&str>, settings: &Settings) -> ProgramRecord {
    let doc = Html::parse_document(html);

    let program_title = page::title(&doc);
    let block = page::text_block(&doc);
    let catalog_year = match block {
        Some(b) => text::catalog_year(&text::element_text(b)),
        None => {
            debug!("no rich-text block; scanning whole page for catalog year");
            text::catalog_year(&text::element_text(doc.root_element()))
        }
    };

    let paragraphs = block.map(page::paragraphs).unwrap_or_default();
    let (preface, req_paragraphs) = page::split_paragraphs(&paragraphs);
    let preface: Vec<_> = preface
        .into_iter()
        .filter(|p| text::catalog_year(&text::element_text(*p)).is_none())
        .collect();

    let faculty = faculty::extract(&preface);
    let requirements = requirements::extract(&req_paragraphs);

    let courses_endpoint = page::courses_endpoint(&doc, page_url);
    let courses_html = match (&courses_endpoint, settings.fetch_courses) {
        (Some(url), true) => Some(fetch::fetch_courses_html(url, settings)),
        _ => None,
    };

    info!(
        title = program_title.as_deref().unwrap_or("-"),
        catalog_year = catalog_year.as_deref().unwrap_or("-"),
        faculty = faculty.len(),
        sections = requirements.other_sections.len(),
        has_endpoint = courses_endpoint.is_some(),
        "parsed program page"
    );

    ProgramRecord {
        program_title,
        catalog_year,
        page_url: page_url.map(str::to_string),
        faculty,
        requirements,
        courses_endpoint,
        courses_html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page() {
        let r = parse_program_page("", None);
        assert_eq!(r, ProgramRecord::default());
    }

    #[test]
    fn year_outside_block_when_block_missing() {
        let r = parse_program_page("<div><p>2024-25 Catalog</p><p>JANE, Prof</p></div>", None);
        assert_eq!(r.catalog_year.as_deref(), Some("2024-25"));
        assert!(r.faculty.is_empty());
    }

    #[test]
    fn year_paragraph_not_faculty() {
        let html = r#"<div class="paragraph--type--text">
            <p>2025-26 Catalog</p>
            <p>JANE DOE, Professor<br>Ph.D., Somewhere</p>
            <p><strong>Minor in Chemistry.</strong> 20 credits</p>
        </div>"#;
        let r = parse_program_page(html, Some("https://example.edu/chem"));
        assert_eq!(r.catalog_year.as_deref(), Some("2025-26"));
        assert_eq!(r.faculty.len(), 1);
        assert_eq!(r.faculty[0].name, "JANE DOE");
        assert_eq!(r.requirements.minor_in.as_deref(), Some("20 credits"));
        assert_eq!(r.page_url.as_deref(), Some("https://example.edu/chem"));
        assert_eq!(r.courses_endpoint, None);
    }

    #[test]
    fn fetch_disabled_leaves_html_absent() {
        let html = r#"<script src="courselist.php?area=chem"></script>"#;
        let r = extract_program(html, Some("https://example.edu/chem/"), &Settings::default());
        assert_eq!(
            r.courses_endpoint.as_deref(),
            Some("https://example.edu/chem/courselist.php?area=chem")
        );
        assert_eq!(r.courses_html, None);
    }
}
