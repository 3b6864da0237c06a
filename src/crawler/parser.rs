//! HTML parser for extracting anchors
//!
//! This module only pulls raw `href` values and the page title out of a
//! document; resolving and classifying them is the link classifier's job.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Raw `href` attribute of every `<a>` element, in document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts anchor references
///
/// Anchors with a `download` attribute are kept: resource sites often mark
/// their source files that way.
///
/// # Example
///
/// ```
/// use hdl_harvest::crawler::parse_html;
///
/// let html = r#"<html><head><title>Verilog</title></head>
///     <body><a href="adder.v">Adder</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Verilog".to_string()));
/// assert_eq!(parsed.hrefs, vec!["adder.v".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
