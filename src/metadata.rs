//! Metadata Extractor (§4.6): reads `<head>` into a `PageMeta`.

use dom_query::Document;

use crate::dom;
use crate::scope::{HrefLang, OpenGraph, PageMeta};

/// Extracts `PageMeta` from `html`. Parsing never fails (§4.1); a document
/// with no `<head>` content yields an all-default `PageMeta`.
#[must_use]
pub fn parse_meta(html: &str) -> PageMeta {
    let doc = Document::from(html);

    let title = first_trimmed_text(&doc, "title");
    let heading = first_trimmed_text(&doc, "h1");
    let description = meta_content(&doc, "description");
    let keywords = meta_content(&doc, "keywords");
    let robots = meta_content(&doc, "robots");
    let index = !robots
        .as_deref()
        .is_some_and(|r| r.to_lowercase().contains("noindex"));
    let canonical = link_href(&doc, r#"link[rel="canonical"]"#);
    let hreflang = hreflang_links(&doc);
    let opengraph = opengraph(&doc);

    PageMeta {
        title,
        description,
        keywords,
        canonical,
        robots,
        index,
        heading,
        hreflang,
        opengraph,
    }
}

fn first_trimmed_text(doc: &Document, selector: &str) -> Option<String> {
    let found = doc.select(selector);
    let node = found.nodes().first()?;
    let sel = dom_query::Selection::from(*node);
    let text = dom::text_content(&sel).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn meta_content(doc: &Document, name: &str) -> Option<String> {
    let selector = format!(r#"meta[name="{name}"]"#);
    let found = doc.select(&selector);
    let node = found.nodes().first()?;
    let sel = dom_query::Selection::from(*node);
    dom::get_attribute(&sel, "content").filter(|s| !s.trim().is_empty())
}

fn link_href(doc: &Document, selector: &str) -> Option<String> {
    let found = doc.select(selector);
    let node = found.nodes().first()?;
    let sel = dom_query::Selection::from(*node);
    dom::get_attribute(&sel, "href").filter(|s| !s.trim().is_empty())
}

fn hreflang_links(doc: &Document) -> Vec<HrefLang> {
    doc.select(r#"link[rel="alternate"]"#)
        .nodes()
        .iter()
        .filter_map(|node| {
            let sel = dom_query::Selection::from(*node);
            let lang = dom::get_attribute(&sel, "hreflang")?;
            let url = dom::get_attribute(&sel, "href")?;
            Some(HrefLang { lang, url })
        })
        .collect()
}

fn opengraph(doc: &Document) -> OpenGraph {
    OpenGraph {
        title: og_property(doc, "og:title"),
        description: og_property(doc, "og:description"),
        image: og_property(doc, "og:image"),
        url: og_property(doc, "og:url"),
        r#type: og_property(doc, "og:type"),
        site_name: og_property(doc, "og:site_name"),
    }
}

fn og_property(doc: &Document, property: &str) -> Option<String> {
    let selector = format!(r#"meta[property="{property}"]"#);
    let found = doc.select(&selector);
    let node = found.nodes().first()?;
    let sel = dom_query::Selection::from(*node);
    dom::get_attribute(&sel, "content").filter(|s| !s.trim().is_empty())
}
