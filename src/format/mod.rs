//! Format Pipeline (§4.3): the sole place where `Html`/`Markdown`/`Text`
//! conversion happens. Every scope hands it an HTML fragment (or, for a
//! `Function` scope that returned something other than HTML, a plain
//! string already decided not to be parsed).
//!
//! Grounded on the teacher's own Markdown path (`extract.rs`'s
//! `quick_html2md::html_to_markdown_with_options` +
//! `markdown::post_process_markdown`), generalized from "the extraction
//! result" to "whatever fragment the engine produced for this scope."

use crate::extractor::EngineOutput;
use crate::options::ExtractOptions;
use crate::scope::Format;

/// Runs `output` through the Format Pipeline for `format`.
#[must_use]
pub fn render(output: &EngineOutput, format: Format, options: &ExtractOptions) -> String {
    if !output.is_html {
        return match format {
            Format::Text => normalize_text(&output.content),
            Format::Html | Format::Markdown => output.content.trim_end().to_string(),
        };
    }

    match format {
        Format::Html => output.content.clone(),
        Format::Markdown => render_markdown(&output.content, options),
        Format::Text => normalize_text(&output.text_fallback),
    }
}

fn render_markdown(html_fragment: &str, options: &ExtractOptions) -> String {
    use quick_html2md::{html_to_markdown_with_options, MarkdownOptions};

    let cleaned = drop_empty_anchors(html_fragment);
    let md_options = MarkdownOptions::new()
        .include_links(options.include_links)
        .include_images(options.include_images)
        .preserve_tables(options.preserve_tables);
    let raw = html_to_markdown_with_options(&cleaned, &md_options);
    crate::markdown::post_process_markdown(&raw).trim_end().to_string()
}

/// Removes `<a>` elements whose text is empty or whitespace-only (§4.3),
/// before Markdown conversion sees them.
fn drop_empty_anchors(html_fragment: &str) -> String {
    let doc = dom_query::Document::from(html_fragment);
    let anchors = doc.select("a");
    for node in anchors.nodes() {
        let sel = dom_query::Selection::from(*node);
        if crate::dom::text_content(&sel).trim().is_empty() {
            sel.remove();
        }
    }
    crate::dom::outer_html(&doc.select("body")).to_string()
}

/// §4.3 `Text`: collapse whitespace runs to a single space, collapse
/// blank-line runs to a single blank line, trim.
fn normalize_text(input: &str) -> String {
    let space_collapsed: String = {
        let mut out = String::with_capacity(input.len());
        let mut last_was_space = false;
        for ch in input.chars() {
            if ch == '\n' {
                out.push('\n');
                last_was_space = false;
            } else if ch.is_whitespace() {
                if !last_was_space {
                    out.push(' ');
                }
                last_was_space = true;
            } else {
                out.push(ch);
                last_was_space = false;
            }
        }
        out
    };

    let lines: Vec<&str> = space_collapsed.split('\n').map(str::trim).collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut blank_run = false;
    for line in lines {
        if line.is_empty() {
            if !blank_run {
                out.push(line);
            }
            blank_run = true;
        } else {
            out.push(line);
            blank_run = false;
        }
    }

    out.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::DomBridge;
    use crate::scope::{Scope, ScopeResolution};

    fn output(content: &str, text_fallback: &str) -> EngineOutput {
        EngineOutput {
            content: content.to_string(),
            text_fallback: text_fallback.to_string(),
            is_html: true,
            resolution: ScopeResolution {
                requested: Scope::Main,
                used: Scope::Main,
                resolved: false,
                handler_id: None,
            },
        }
    }

    #[test]
    fn html_format_is_passthrough() {
        let out = output("<p>Hi</p>", "Hi");
        assert_eq!(render(&out, Format::Html, &ExtractOptions::default()), "<p>Hi</p>");
    }

    #[test]
    fn text_format_collapses_and_trims() {
        let out = output("<p>Hi   there</p>", "  Hi   there  \n\n\nmore  ");
        assert_eq!(render(&out, Format::Text, &ExtractOptions::default()), "Hi there\n\nmore");
    }

    #[test]
    fn markdown_format_converts_headings() {
        let out = output("<h1>Hello</h1>", "Hello");
        let rendered = render(&out, Format::Markdown, &ExtractOptions::default());
        assert!(rendered.starts_with('#'));
    }

    #[test]
    fn markdown_format_trims_trailing_whitespace() {
        let out = output("<h1>Hello</h1>\n\n  \n", "Hello");
        let rendered = render(&out, Format::Markdown, &ExtractOptions::default());
        assert_eq!(rendered, rendered.trim_end());
    }

    #[test]
    fn empty_anchors_are_dropped_from_markdown() {
        let html = r#"<p><a href="x"></a><a href="y">keep</a></p>"#;
        let cleaned = drop_empty_anchors(html);
        assert!(!cleaned.contains(r#"href="x""#));
        assert!(cleaned.contains(r#"href="y""#));
    }

    #[test]
    fn non_html_function_result_passes_through_markdown_and_html_unchanged() {
        let mut non_html = output("just plain text", "just plain text");
        non_html.is_html = false;
        assert_eq!(render(&non_html, Format::Html, &ExtractOptions::default()), "just plain text");
        assert_eq!(render(&non_html, Format::Markdown, &ExtractOptions::default()), "just plain text");
    }

    #[test]
    fn bridge_construction_is_unaffected_by_format_rendering() {
        let bridge = DomBridge::new("<p>Hi</p>");
        assert!(!bridge.root().is_empty());
    }
}
