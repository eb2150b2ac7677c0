//! Markdown rendering for free-text dataset fields.
//!
//! Raw HTML blocks and inline HTML in the source are dropped, so the
//! output only contains markup generated from Markdown syntax.

use pulldown_cmark::{html, Event, Options, Parser};

/// Renders Markdown to HTML.
///
/// Empty or whitespace-only input yields an empty string. Trailing
/// newlines of the rendered HTML are trimmed.
#[must_use]
pub fn render_markdown(source: &str) -> String {
    let source = source.trim();
    if source.is_empty() {
        return String::new();
    }
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(source, options)
        .filter(|event| !matches!(event, Event::Html(_) | Event::InlineHtml(_)));
    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, events);
    output.truncate(output.trim_end().len());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_and_emphasis() {
        assert_eq!(
            render_markdown("Daten der **Stadt** Zürich"),
            "<p>Daten der <strong>Stadt</strong> Zürich</p>"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(render_markdown(""), "");
        assert_eq!(render_markdown("  \n "), "");
    }

    #[test]
    fn test_links() {
        let html = render_markdown("[Doku](https://example.org/doku)");
        assert!(html.contains(r#"<a href="https://example.org/doku">Doku</a>"#));
    }

    #[test]
    fn test_raw_html_is_dropped() {
        let html = render_markdown("Text <script>alert(1)</script> mehr");
        assert!(!html.contains("<script>"));
        assert!(html.starts_with("<p>Text"));
    }
}
