//! The six literal end-to-end scenarios from spec §8, verbatim.

use webscope::{extract_with_scope, Format, Scope};

#[test]
fn scenario_1_main_markdown() {
    let html = "<html><body><nav>Skip</nav><main><h1>Hello</h1><p>World</p></main></body></html>";
    let result = extract_with_scope(html, &Scope::Main, Format::Markdown, "https://example.com/", None).unwrap();
    assert_eq!(result.content, "# Hello\n\nWorld");
    assert_eq!(result.resolution.used, Scope::Main);
    assert!(!result.resolution.resolved);
}

#[test]
fn scenario_2_selector_with_exclude() {
    let html = "<div id=root><p class=ad>no</p><p>yes</p></div>";
    let scope = Scope::Selector {
        include: vec!["#root".to_string()],
        exclude: Some(vec![".ad".to_string()]),
    };
    let result = extract_with_scope(html, &scope, Format::Text, "https://example.com/", None).unwrap();
    assert_eq!(result.content, "yes");
}

#[test]
fn scenario_3_full_vs_main() {
    let html = "<body><nav>N</nav><article>A</article></body>";
    let main = extract_with_scope(html, &Scope::Main, Format::Text, "https://example.com/", None).unwrap();
    assert_eq!(main.content, "A");
    let full = extract_with_scope(html, &Scope::Full, Format::Text, "https://example.com/", None).unwrap();
    assert_eq!(full.content, "N\nA");
}

#[test]
fn scenario_4_function_returning_object() {
    let html = "<html><body><h1>Title</h1></body></html>";
    let scope = Scope::Function {
        code: "(api,u)=>({title:api.$('h1')?.text})".to_string(),
        timeout_ms: 5000,
    };
    let result = extract_with_scope(html, &scope, Format::Html, "https://example.com/", None).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    assert_eq!(parsed["title"], "Title");
}

#[test]
fn scenario_5_function_timeout() {
    let html = "<body></body>";
    let scope = Scope::Function {
        code: "(a,u)=>{while(true){}}".to_string(),
        timeout_ms: 50,
    };
    let start = std::time::Instant::now();
    let result = extract_with_scope(html, &scope, Format::Text, "https://example.com/", None);
    assert!(result.is_err());
    assert!(start.elapsed() < std::time::Duration::from_millis(300));
}

#[test]
fn scenario_6_auto_fallback() {
    let html = "<html><body><nav>Skip</nav><main><h1>Hello</h1><p>World</p></main></body></html>";
    let result = extract_with_scope(html, &Scope::Auto, Format::Markdown, "https://example.com/", None).unwrap();
    assert_eq!(result.content, "# Hello\n\nWorld");
    assert_eq!(result.resolution.used, Scope::Main);
    assert!(result.resolution.resolved);
}
