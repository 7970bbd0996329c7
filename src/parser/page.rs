use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;
use url::Url;

use super::text::{element_text, normalize};

const COURSELIST_MARKER: &str = "courselist.php";

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, h1 span").unwrap());
static OG_TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static TEXT_BLOCK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".paragraph--type--text").unwrap());
static PARAGRAPH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static SCRIPT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script[src]").unwrap());

/// Page heading, falling back to `og:title`.
pub fn title(doc: &Html) -> Option<String> {
    let heading = doc
        .select(&TITLE_SEL)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());
    heading.or_else(|| {
        doc.select(&OG_TITLE_SEL)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(normalize)
            .filter(|t| !t.is_empty())
    })
}

/// The rich-text block holding year, faculty and requirements.
pub fn text_block(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&TEXT_BLOCK_SEL).next()
}

pub fn paragraphs(block: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    block.select(&PARAGRAPH_SEL).collect()
}

const BOLD_TAGS: &[&str] = &["strong", "b"];

/// Text of the bold element that opens `p`: the first non-blank text in the
/// paragraph must sit inside a `strong`/`b`. Bold text further along is not a label.
pub fn leading_bold_label(p: ElementRef) -> Option<String> {
    let first_text = p.descendants().find(|node| match node.value() {
        Node::Text(t) => !t.trim().is_empty(),
        _ => false,
    })?;

    first_text
        .ancestors()
        .take_while(|anc| anc.id() != p.id())
        .filter_map(ElementRef::wrap)
        .filter(|el| BOLD_TAGS.contains(&el.value().name()))
        .last()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// Paragraphs before the first leading bold label, and the rest starting at it.
pub fn split_paragraphs<'a>(
    paragraphs: &[ElementRef<'a>],
) -> (Vec<ElementRef<'a>>, Vec<ElementRef<'a>>) {
    let mut preface = Vec::new();
    let mut requirements = Vec::new();
    let mut seen_header = false;

    for p in paragraphs {
        if !seen_header && leading_bold_label(*p).is_some() {
            seen_header = true;
        }
        if seen_header {
            requirements.push(*p);
        } else {
            preface.push(*p);
        }
    }

    (preface, requirements)
}

/// `src` of the course-list script, resolved against `page_url` when one is given.
pub fn courses_endpoint(doc: &Html, page_url: Option<&str>) -> Option<String> {
    let src = doc
        .select(&SCRIPT_SEL)
        .filter_map(|s| s.value().attr("src"))
        .find(|src| src.contains(COURSELIST_MARKER))?;

    let Some(base) = page_url else {
        return Some(src.to_string());
    };
    match Url::parse(base).and_then(|b| b.join(src)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            warn!(page_url = base, src, error = %e, "could not resolve courses endpoint");
            Some(src.to_string())
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_h1() {
        let doc = Html::parse_document("<h1>\n  <span>Chemistry</span>\n</h1><h1>Other</h1>");
        assert_eq!(title(&doc).as_deref(), Some("Chemistry"));
    }

    #[test]
    fn title_falls_back_to_og() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:title" content=" Chemistry | Augustana "></head>
               <body><h1>  </h1></body></html>"#,
        );
        assert_eq!(title(&doc).as_deref(), Some("Chemistry | Augustana"));
    }

    #[test]
    fn title_absent() {
        let doc = Html::parse_document(r#"<meta property="og:title" content=""><p>x</p>"#);
        assert_eq!(title(&doc), None);
    }

    #[test]
    fn split_at_first_bold() {
        let doc = Html::parse_document(
            "<div class=\"paragraph--type--text\">\
             <p>A, Prof</p><p>B, Prof</p>\
             <p><strong>Major in X</strong> body</p><p>tail</p><p><b>Minor in X</b></p>\
             </div>",
        );
        let ps = paragraphs(text_block(&doc).unwrap());
        let (preface, req) = split_paragraphs(&ps);
        assert_eq!(preface.len(), 2);
        assert_eq!(req.len(), 3);
        assert_eq!(element_text(req[1]), "tail");
    }

    #[test]
    fn split_without_bold() {
        let doc = Html::parse_document("<div class=\"paragraph--type--text\"><p>a</p><p>b</p></div>");
        let ps = paragraphs(text_block(&doc).unwrap());
        let (preface, req) = split_paragraphs(&ps);
        assert_eq!(preface.len(), 2);
        assert!(req.is_empty());
    }

    fn label_of(html: &str) -> Option<String> {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("p").unwrap();
        leading_bold_label(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn empty_bold_is_not_a_label() {
        assert_eq!(label_of("<p><strong> </strong>plain</p>"), None);
    }

    #[test]
    fn leading_bold_labels() {
        assert_eq!(label_of("<p>\n  <strong>Major in X.</strong> body</p>").as_deref(), Some("Major in X."));
        assert_eq!(label_of("<p><a href=\"#m\"><b><em>Minor</em> in X</b></a>: body</p>").as_deref(), Some("Minor in X"));
        assert_eq!(label_of("<p><strong><strong>Nested</strong> label</strong> body</p>").as_deref(), Some("Nested label"));
    }

    #[test]
    fn bold_mid_paragraph_is_not_a_label() {
        assert_eq!(label_of("<p>Students must also complete <strong>CHEM-450</strong>.</p>"), None);
        assert_eq!(label_of("<p>JANE DOE, <b>Chair</b> and Professor</p>"), None);
    }

    #[test]
    fn split_ignores_bold_inside_faculty_lines() {
        let doc = Html::parse_document(
            "<div class=\"paragraph--type--text\">\
             <p>JANE DOE, <b>Chair</b> and Professor<br>Ph.D. Yale</p><p>JOHN ROE, Professor</p>\
             <p><strong>Major in X</strong> body</p>\
             </div>",
        );
        let ps = paragraphs(text_block(&doc).unwrap());
        let (preface, req) = split_paragraphs(&ps);
        assert_eq!(preface.len(), 2);
        assert_eq!(req.len(), 1);
    }

    #[test]
    fn endpoint_resolved_against_page() {
        let doc = Html::parse_document(
            r#"<script src="/js/app.js"></script><script src="courselist.php?area=chem"></script>"#,
        );
        assert_eq!(
            courses_endpoint(&doc, Some("https://example.edu/chemistry/courses")).as_deref(),
            Some("https://example.edu/chemistry/courselist.php?area=chem")
        );
    }

    #[test]
    fn endpoint_absolute_and_raw() {
        let src = "https://www.augustana.net/prebuilt/catalog/courselist.php?area=chem";
        let doc = Html::parse_document(&format!(r#"<script src="{src}"></script>"#));
        assert_eq!(
            courses_endpoint(&doc, Some("https://www.augustana.edu/x")).as_deref(),
            Some(src)
        );
        assert_eq!(courses_endpoint(&doc, None).as_deref(), Some(src));
    }

    #[test]
    fn endpoint_bad_base_keeps_raw() {
        let doc = Html::parse_document(r#"<script src="courselist.php?area=art"></script>"#);
        assert_eq!(
            courses_endpoint(&doc, Some("not a url")).as_deref(),
            Some("courselist.php?area=art")
        );
    }

    #[test]
    fn endpoint_missing() {
        let doc = Html::parse_document(r#"<script src="/js/app.js"></script><script>courselist.php</script>"#);
        assert_eq!(courses_endpoint(&doc, Some("https://example.edu/")), None);
    }
}
