//! Extraction Engine (§4.2): given a resolved `Scope` and a `DomBridge`,
//! produces an HTML fragment (or, for `Function`, a possibly-non-HTML
//! string) plus a plain-text fallback, and records how the scope actually
//! resolved.

pub mod removal;

use dom_query::NodeRef;

use crate::bridge::{block_aware_text, DomBridge};
use crate::error::ExtractError;
use crate::handlers::HandlerLookup;
use crate::options::ExtractOptions;
use crate::scope::{Scope, ScopeResolution};
use removal::{apply_global_removals, apply_main_noise_removal, MAIN_CONTAINER_CANDIDATES};

/// What the engine produced for one scope, before the Format Pipeline.
pub struct EngineOutput {
    /// The extracted content: an HTML fragment for every scope except a
    /// `Function` scope whose return value doesn't look like HTML.
    pub content: String,
    /// Plain-text fallback, used by the Format Pipeline for `Text`.
    pub text_fallback: String,
    /// False only for a `Function` scope whose return value doesn't
    /// contain both `<` and `>` — the Format Pipeline then passes `content`
    /// through unchanged instead of parsing it as HTML (§4.2).
    pub is_html: bool,
    /// Resolution record for the request (§3, §4.2).
    pub resolution: ScopeResolution,
}

/// Extracts `scope` from `bridge`. `url` is passed through to the sandbox
/// (`Function`) and the handler lookup (`Auto`/`Handler`).
pub fn extract(
    bridge: &mut DomBridge,
    scope: &Scope,
    url: &str,
    handler_lookup: Option<&dyn HandlerLookup>,
    options: &ExtractOptions,
) -> Result<EngineOutput, ExtractError> {
    extract_inner(bridge, scope, scope, url, handler_lookup, false, options)
}

#[allow(clippy::too_many_arguments)]
fn extract_inner(
    bridge: &mut DomBridge,
    requested: &Scope,
    scope: &Scope,
    url: &str,
    handler_lookup: Option<&dyn HandlerLookup>,
    already_resolved: bool,
    options: &ExtractOptions,
) -> Result<EngineOutput, ExtractError> {
    match scope {
        Scope::Main => {
            let (content, text_fallback) = extract_main(bridge, options);
            Ok(EngineOutput {
                content,
                text_fallback,
                is_html: true,
                resolution: ScopeResolution {
                    requested: requested.clone(),
                    used: scope.clone(),
                    resolved: already_resolved,
                    handler_id: None,
                },
            })
        }
        Scope::Full => {
            let (content, text_fallback) = extract_full(bridge);
            Ok(EngineOutput {
                content,
                text_fallback,
                is_html: true,
                resolution: ScopeResolution {
                    requested: requested.clone(),
                    used: scope.clone(),
                    resolved: already_resolved,
                    handler_id: None,
                },
            })
        }
        Scope::Selector { include, exclude } => {
            let (content, text_fallback) = extract_selector(bridge, include, exclude.as_deref());
            Ok(EngineOutput {
                content,
                text_fallback,
                is_html: true,
                resolution: ScopeResolution {
                    requested: requested.clone(),
                    used: scope.clone(),
                    resolved: already_resolved,
                    handler_id: None,
                },
            })
        }
        Scope::Function { code, timeout_ms } => {
            let html = crate::dom::outer_html(&bridge.root()).to_string();
            let raw = crate::sandbox::run(bridge, &html, url, code, *timeout_ms)?;
            let is_html = raw.contains('<') && raw.contains('>');
            let text_fallback = if is_html {
                html_text_fallback(&raw)
            } else {
                raw.clone()
            };
            Ok(EngineOutput {
                content: raw,
                text_fallback,
                is_html,
                resolution: ScopeResolution {
                    requested: requested.clone(),
                    used: scope.clone(),
                    resolved: already_resolved,
                    handler_id: None,
                },
            })
        }
        Scope::Auto => {
            let Some(lookup) = handler_lookup else {
                return extract_inner(bridge, requested, &Scope::Main, url, None, true, options);
            };
            match lookup.lookup(url, None) {
                Some(resolved_scope) => {
                    let mut output = extract_inner(
                        bridge,
                        requested,
                        &resolved_scope,
                        url,
                        Some(lookup),
                        true,
                        options,
                    )?;
                    output.resolution.resolved = true;
                    Ok(output)
                }
                None => extract_inner(bridge, requested, &Scope::Main, url, Some(lookup), true, options),
            }
        }
        Scope::Handler { id } => {
            let resolved = handler_lookup.and_then(|lookup| lookup.lookup(url, Some(id)));
            match resolved {
                Some(resolved_scope) => {
                    let mut output = extract_inner(
                        bridge,
                        requested,
                        &resolved_scope,
                        url,
                        handler_lookup,
                        already_resolved,
                        options,
                    )?;
                    output.resolution.handler_id = Some(id.clone());
                    Ok(output)
                }
                None => Err(ExtractError::HandlerUnavailable(id.clone())),
            }
        }
    }
}

fn extract_main(bridge: &DomBridge, options: &ExtractOptions) -> (String, String) {
    apply_global_removals(bridge.document());
    apply_main_noise_removal(bridge.document());

    for candidate in MAIN_CONTAINER_CANDIDATES {
        let found = bridge.document().select(candidate);
        let Some(node) = found.nodes().first().copied() else {
            continue;
        };
        let text = block_aware_text(node);
        if text.chars().count() >= options.min_main_content_len {
            let sel = dom_query::Selection::from(node);
            return (crate::dom::inner_html(&sel).to_string(), text);
        }
    }

    let root = body_or_root(bridge);
    let text = root
        .nodes()
        .first()
        .map(|n| block_aware_text(*n))
        .unwrap_or_default();
    (crate::dom::inner_html(&root).to_string(), text)
}

fn extract_full(bridge: &DomBridge) -> (String, String) {
    apply_global_removals(bridge.document());

    let root = body_or_root(bridge);
    let text = root
        .nodes()
        .first()
        .map(|n| block_aware_text(*n))
        .unwrap_or_default();
    (crate::dom::inner_html(&root).to_string(), text)
}

fn extract_selector(
    bridge: &DomBridge,
    include: &[String],
    exclude: Option<&[String]>,
) -> (String, String) {
    apply_global_removals(bridge.document());

    let mut seen = std::collections::HashSet::new();
    let mut matched: Vec<NodeRef<'_>> = Vec::new();
    for sel in include {
        for node in bridge.document().select(sel).nodes() {
            if seen.insert(node.id()) {
                matched.push(node);
            }
        }
    }

    if let Some(exclude) = exclude {
        for node in &matched {
            let scoped = dom_query::Selection::from(*node);
            for ex_sel in exclude {
                scoped.select(ex_sel).remove();
            }
        }
    }

    let mut html_parts = Vec::with_capacity(matched.len());
    let mut text_parts = Vec::with_capacity(matched.len());
    for node in matched {
        let sel = dom_query::Selection::from(node);
        html_parts.push(crate::dom::inner_html(&sel).to_string());
        text_parts.push(block_aware_text(node));
    }

    (html_parts.join("\n"), text_parts.join("\n"))
}

fn body_or_root<'d>(bridge: &'d DomBridge) -> dom_query::Selection<'d> {
    let body = bridge.document().select("body");
    if !body.is_empty() {
        return body;
    }
    let html = bridge.document().select("html");
    if !html.is_empty() {
        return html;
    }
    bridge.document().select("*")
}

/// Parses a freshly-returned `Function` scope string into a throwaway
/// document, just long enough to compute its block-aware text (§4.2
/// `Function`: "if that string looks like HTML ... treat it as HTML").
fn html_text_fallback(html: &str) -> String {
    let doc = dom_query::Document::from(html);
    let body = doc.select("body");
    let root = if !body.is_empty() {
        body
    } else {
        let html_el = doc.select("html");
        if !html_el.is_empty() {
            html_el
        } else {
            doc.select("*")
        }
    };
    root.nodes()
        .first()
        .map(|n| block_aware_text(*n))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::StaticHandlerRegistry;

    #[test]
    fn main_scope_falls_back_to_body_when_no_container_qualifies() {
        let mut bridge = DomBridge::new("<body><p>short</p></body>");
        let output = extract(&mut bridge, &Scope::Main, "https://x/", None, &ExtractOptions::default()).unwrap();
        assert!(output.content.contains("short"));
        assert!(!output.resolution.resolved);
    }

    #[test]
    fn full_vs_main_scenario() {
        let html = "<body><nav>N</nav><article>A</article></body>";

        let mut main_bridge = DomBridge::new(html);
        let main_out = extract(&mut main_bridge, &Scope::Main, "https://x/", None, &ExtractOptions::default()).unwrap();
        assert_eq!(main_out.text_fallback, "A");

        let mut full_bridge = DomBridge::new(html);
        let full_out = extract(&mut full_bridge, &Scope::Full, "https://x/", None, &ExtractOptions::default()).unwrap();
        assert_eq!(full_out.text_fallback, "N\nA");
    }

    #[test]
    fn selector_scope_with_exclude() {
        let mut bridge = DomBridge::new(r#"<div id=root><p class=ad>no</p><p>yes</p></div>"#);
        let scope = Scope::Selector {
            include: vec!["#root".to_string()],
            exclude: Some(vec![".ad".to_string()]),
        };
        let output = extract(&mut bridge, &scope, "https://x/", None, &ExtractOptions::default()).unwrap();
        assert_eq!(output.text_fallback, "yes");
    }

    #[test]
    fn selector_scope_deduplicates_overlapping_includes() {
        let mut bridge = DomBridge::new(r#"<div id=root><p class=item>c</p></div>"#);
        let scope = Scope::Selector {
            include: vec!["#root".to_string(), ".item".to_string()],
            exclude: None,
        };
        let output = extract(&mut bridge, &scope, "https://x/", None, &ExtractOptions::default()).unwrap();
        assert_eq!(output.text_fallback.matches('c').count(), 1);
    }

    #[test]
    fn auto_falls_back_to_main_without_handler_lookup() {
        let mut bridge = DomBridge::new("<body><article>content here that is long enough to pass the minimum main length threshold for qualification testing yes</article></body>");
        let output = extract(&mut bridge, &Scope::Auto, "https://x/", None, &ExtractOptions::default()).unwrap();
        assert_eq!(output.resolution.used, Scope::Main);
        assert!(output.resolution.resolved);
    }

    #[test]
    fn handler_scope_errors_without_lookup() {
        let mut bridge = DomBridge::new("<body></body>");
        let scope = Scope::Handler { id: "x".to_string() };
        let err = extract(&mut bridge, &scope, "https://x/", None, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, ExtractError::HandlerUnavailable(_)));
    }

    #[test]
    fn handler_scope_resolves_through_lookup() {
        let mut bridge = DomBridge::new("<body><p>hi</p></body>");
        let registry = StaticHandlerRegistry::new().with_id("x", Scope::Full);
        let scope = Scope::Handler { id: "x".to_string() };
        let output = extract(&mut bridge, &scope, "https://x/", Some(&registry), &ExtractOptions::default()).unwrap();
        assert_eq!(output.resolution.used, Scope::Full);
        assert_eq!(output.resolution.handler_id, Some("x".to_string()));
    }
}
