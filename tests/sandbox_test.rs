//! Capability-restricted JS sandbox, end to end through `extract_with_scope`
//! (spec §4.4, §8 scenarios 4 and 5).

use webscope::{extract_with_scope, Format, Scope};

#[test]
fn function_scope_returns_pretty_printed_json_object() {
    let html = "<html><body><h1>Title</h1></body></html>";
    let scope = Scope::Function {
        code: "(api,u)=>({title:api.$('h1')?.text})".to_string(),
        timeout_ms: 5000,
    };
    let result = extract_with_scope(html, &scope, Format::Html, "https://example.com/", None).unwrap();
    assert!(result.content.contains("\"title\""));
    assert!(result.content.contains("Title"));
}

#[test]
fn function_scope_timeout_surfaces_as_function_scope_error() {
    let html = "<body></body>";
    let scope = Scope::Function {
        code: "(a,u)=>{while(true){}}".to_string(),
        timeout_ms: 50,
    };
    let start = std::time::Instant::now();
    let result = extract_with_scope(html, &scope, Format::Text, "https://example.com/", None);
    let elapsed = start.elapsed();

    assert!(result.is_err());
    assert!(elapsed < std::time::Duration::from_millis(500));
}

#[test]
fn function_scope_surfaces_thrown_exceptions() {
    let html = "<body></body>";
    let scope = Scope::Function {
        code: "(a,u)=>{throw new Error('boom')}".to_string(),
        timeout_ms: 1000,
    };
    let result = extract_with_scope(html, &scope, Format::Text, "https://example.com/", None);
    assert!(result.is_err());
}

#[test]
fn function_scope_rejects_document_access_at_validation_time() {
    let html = "<body></body>";
    let scope = Scope::Function {
        code: "(a,u)=>document.cookie".to_string(),
        timeout_ms: 1000,
    };
    let result = extract_with_scope(html, &scope, Format::Text, "https://example.com/", None);
    assert!(result.is_err());
}

#[test]
fn function_scope_rejects_syntax_errors() {
    let html = "<body></body>";
    let scope = Scope::Function {
        code: "(a,u) => {".to_string(),
        timeout_ms: 1000,
    };
    let result = extract_with_scope(html, &scope, Format::Text, "https://example.com/", None);
    assert!(result.is_err());
}

#[test]
fn function_scope_html_shaped_result_renders_as_text_fallback_under_text_format() {
    let html = "<body></body>";
    let scope = Scope::Function {
        code: "(a,u)=>'<p>hi</p>'".to_string(),
        timeout_ms: 1000,
    };
    let result = extract_with_scope(html, &scope, Format::Text, "https://example.com/", None).unwrap();
    assert_eq!(result.content, "hi");
}
