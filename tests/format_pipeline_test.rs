//! Format Pipeline conversions (spec §4.3): HTML passthrough, Markdown
//! conversion, Text normalization, and normalization idempotence (§8).

use webscope::{extract_with_scope, Format, Scope};

#[test]
fn html_format_is_a_passthrough_fragment() {
    let html = "<body><article><p>Hello <b>world</b></p></article></body>";
    let result = extract_with_scope(html, &Scope::Main, Format::Html, "https://example.com/", None).unwrap();
    assert!(result.content.contains("<b>world</b>"));
}

#[test]
fn markdown_format_converts_headings_and_paragraphs() {
    let html = "<body><main><h1>Title</h1><p>Body text.</p></main></body>";
    let result = extract_with_scope(html, &Scope::Main, Format::Markdown, "https://example.com/", None).unwrap();
    assert_eq!(result.content, "# Title\n\nBody text.");
}

#[test]
fn text_format_collapses_whitespace_and_trims() {
    let html = "<body><article>  Hello   World  \n\n\n  Again  </article></body>";
    let result = extract_with_scope(html, &Scope::Full, Format::Text, "https://example.com/", None).unwrap();
    assert!(!result.content.starts_with(' '));
    assert!(!result.content.ends_with(' '));
    assert!(!result.content.contains("   "));
}

#[test]
fn text_normalization_is_idempotent() {
    let html = "<body><article>  messy   text  here  </article></body>";
    let once = extract_with_scope(html, &Scope::Full, Format::Text, "https://example.com/", None).unwrap();
    let reparsed_body = format!("<body>{}</body>", once.content);
    let twice = extract_with_scope(&reparsed_body, &Scope::Full, Format::Text, "https://example.com/", None).unwrap();
    assert_eq!(once.content, twice.content);
}

#[test]
fn empty_anchors_are_dropped_from_markdown_output() {
    let html = r#"<body><main><p><a href="#"></a>real text</p></main></body>"#;
    let result = extract_with_scope(html, &Scope::Main, Format::Markdown, "https://example.com/", None).unwrap();
    assert!(!result.content.contains('['));
    assert!(result.content.contains("real text"));
}
