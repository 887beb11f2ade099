//! Host DOM Bridge (§4.1).
//!
//! Parses HTML once with `dom_query` and layers a stable, monotonically
//! increasing `NodeId` on top of its element references, so that scoped
//! queries, the sandbox's pre-materialized proxy (§4.4), and the extraction
//! engine (§4.2) can all refer to "the same element" across calls without
//! holding a live borrow.
//!
//! Grounded on `dom.rs`'s adapter functions (`tag_name`, `get_attribute`)
//! for attribute/text reads, and on the id-bridge shape in `ddsa_lib::bridge`
//! (`TsNodeBridge`) for the id-assignment strategy: assign a `NodeId` lazily
//! on first sight, keep a Rust-side `IndexMap`-like table, never expose the
//! underlying reference.

use std::collections::HashMap;

use dom_query::{Document, NodeRef, Selection};
use serde::{Deserialize, Serialize};

use crate::scope::NodeId;

/// Tags whose closing boundary inserts a newline during block-aware text
/// extraction (§4.2 step 4).
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "hr",
    "article", "section", "header", "footer", "blockquote", "pre", "ul",
    "ol", "table", "thead", "tbody", "tfoot", "nav", "aside", "main",
    "figure", "figcaption", "address", "dd", "dt", "dl",
];

/// A by-value description of one element, safe to clone and to cross the
/// sandbox boundary (§3).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Stable id within the owning bridge.
    pub id: NodeId,
    /// Lowercase tag name.
    pub tag: String,
    /// Block-aware normalized text content (§4.2).
    pub text: String,
    /// `innerHTML`.
    pub html: String,
    /// `outerHTML`.
    pub outer_html: String,
    /// All attributes, including `data-*`.
    pub attrs: Vec<(String, String)>,
    /// Subset of `attrs` whose keys begin with `data-`, prefix stripped.
    pub data_attrs: Vec<(String, String)>,
    /// Ordered class-name tokens from the `class` attribute.
    pub classes: Vec<String>,
}

impl NodeSnapshot {
    /// Value of a single attribute, or `None`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a `data-*` attribute by its unprefixed name.
    #[must_use]
    pub fn data_attr(&self, name: &str) -> Option<&str> {
        self.data_attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `classes` contains the given token.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

/// Owns one parsed document and the id-assignment table for its lifetime.
///
/// Exclusively owned by the extraction of a single request (§5); never
/// multiplexed across requests.
pub struct DomBridge {
    doc: Document,
    ids: HashMap<dom_query::NodeId, NodeId>,
    next_id: NodeId,
}

impl DomBridge {
    /// Parses `html` into a new bridge. Parsing never fails (§4.1); malformed
    /// markup is salvaged as leniently as the underlying parser allows.
    #[must_use]
    pub fn new(html: &str) -> Self {
        Self {
            doc: Document::from(html),
            ids: HashMap::new(),
            next_id: 1,
        }
    }

    /// The full document as a `Selection` rooted at `<html>`, falling back
    /// to `<body>` and then to every top-level node if neither is present.
    #[must_use]
    pub fn root(&self) -> Selection<'_> {
        let html = self.doc.select("html");
        if !html.is_empty() {
            return html;
        }
        let body = self.doc.select("body");
        if !body.is_empty() {
            return body;
        }
        self.doc.select("*")
    }

    /// The underlying `dom_query::Document`, for components (the extraction
    /// engine, the format pipeline) that need raw CSS-selector access.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// First element matching `sel`, or `None`. An invalid selector yields
    /// `None` rather than an error (§4.1, §7).
    #[must_use]
    pub fn query(&mut self, sel: &str) -> Option<NodeSnapshot> {
        let found = self.doc.select(sel);
        let node = *found.nodes().first()?;
        Some(self.snapshot(node))
    }

    /// All elements matching `sel`, in document order.
    #[must_use]
    pub fn query_all(&mut self, sel: &str) -> Vec<NodeSnapshot> {
        let found = self.doc.select(sel);
        found
            .nodes()
            .iter()
            .map(|n| self.snapshot(*n))
            .collect()
    }

    /// First descendant of `id`'s subtree matching `sel`.
    #[must_use]
    pub fn child_query(&mut self, id: NodeId, sel: &str) -> Option<NodeSnapshot> {
        let node = self.resolve(id)?;
        let scoped = Selection::from(node).select(sel);
        let found = *scoped.nodes().first()?;
        Some(self.snapshot(found))
    }

    /// All descendants of `id`'s subtree matching `sel`, in document order.
    #[must_use]
    pub fn child_query_all(&mut self, id: NodeId, sel: &str) -> Vec<NodeSnapshot> {
        let Some(node) = self.resolve(id) else {
            return Vec::new();
        };
        let scoped = Selection::from(node).select(sel);
        scoped
            .nodes()
            .iter()
            .map(|n| self.snapshot(*n))
            .collect()
    }

    /// Nearest ancestor of `id` (inclusive of `id` itself, which is checked
    /// first) matching `sel`.
    #[must_use]
    pub fn closest(&mut self, id: NodeId, sel: &str) -> Option<NodeSnapshot> {
        let mut current = self.resolve(id)?;
        loop {
            if element_matches(&self.doc, current, sel) {
                return Some(self.snapshot(current));
            }
            current = current.parent()?;
            if !current.is_element() {
                return None;
            }
        }
    }

    /// Parent element of `id`, optionally filtered by `sel`.
    #[must_use]
    pub fn parent(&mut self, id: NodeId, sel: Option<&str>) -> Option<NodeSnapshot> {
        let node = self.resolve(id)?;
        let parent = node.parent()?;
        if !parent.is_element() {
            return None;
        }
        if let Some(sel) = sel {
            if !element_matches(&self.doc, parent, sel) {
                return None;
            }
        }
        Some(self.snapshot(parent))
    }

    /// Direct element children of `id`, in document order.
    #[must_use]
    pub fn children(&mut self, id: NodeId) -> Vec<NodeSnapshot> {
        let Some(node) = self.resolve(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut child = node.first_child();
        while let Some(c) = child {
            if c.is_element() {
                out.push(self.snapshot(c));
            }
            child = c.next_sibling();
        }
        out
    }

    /// First element child of `id`.
    #[must_use]
    pub fn first_child(&mut self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.resolve(id)?;
        let mut child = node.first_child();
        while let Some(c) = child {
            if c.is_element() {
                return Some(self.snapshot(c));
            }
            child = c.next_sibling();
        }
        None
    }

    /// Last element child of `id`.
    #[must_use]
    pub fn last_child(&mut self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.resolve(id)?;
        let mut child = node.last_child();
        while let Some(c) = child {
            if c.is_element() {
                return Some(self.snapshot(c));
            }
            child = c.prev_sibling();
        }
        None
    }

    /// Next element sibling of `id`, skipping text nodes.
    #[must_use]
    pub fn next_sibling(&mut self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.resolve(id)?;
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(self.snapshot(s));
            }
            sibling = s.next_sibling();
        }
        None
    }

    /// Previous element sibling of `id`, skipping text nodes.
    #[must_use]
    pub fn prev_sibling(&mut self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.resolve(id)?;
        let mut sibling = node.prev_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(self.snapshot(s));
            }
            sibling = s.prev_sibling();
        }
        None
    }

    /// Assigns (or looks up) the stable id for `node` and builds its
    /// snapshot. Calling this twice for the same underlying element always
    /// returns the same `id` (bridge uniqueness, §8).
    fn snapshot(&mut self, node: NodeRef<'_>) -> NodeSnapshot {
        let id = self.id_for(node);
        let sel = Selection::from(node);

        let all_attrs = crate::dom::get_all_attributes(&sel);
        let data_attrs = all_attrs
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix("data-")
                    .map(|stripped| (stripped.to_string(), v.clone()))
            })
            .collect();
        let classes = all_attrs
            .iter()
            .find(|(k, _)| k == "class")
            .map(|(_, v)| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        NodeSnapshot {
            id,
            tag: crate::dom::tag_name(&sel).unwrap_or_default(),
            text: block_aware_text(node),
            html: crate::dom::inner_html(&sel).to_string(),
            outer_html: crate::dom::outer_html(&sel).to_string(),
            attrs: all_attrs,
            data_attrs,
            classes,
        }
    }

    fn id_for(&mut self, node: NodeRef<'_>) -> NodeId {
        let raw = node.id();
        if let Some(existing) = self.ids.get(&raw) {
            return *existing;
        }
        let assigned = self.next_id;
        self.next_id += 1;
        self.ids.insert(raw, assigned);
        assigned
    }

    /// Finds the live `NodeRef` previously assigned `id`, by walking the
    /// whole tree and matching on the underlying `dom_query::NodeId`. The
    /// bridge never mutates the tree, so this is stable across calls.
    fn resolve(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let raw = self.ids.iter().find(|(_, v)| **v == id).map(|(k, _)| *k)?;
        self.doc
            .select("*")
            .nodes()
            .iter()
            .copied()
            .find(|n| n.id() == raw)
    }
}

pub(crate) fn element_matches(doc: &Document, node: NodeRef<'_>, sel: &str) -> bool {
    if !node.is_element() {
        return false;
    }
    doc.select(sel)
        .nodes()
        .iter()
        .any(|n| n.id() == node.id())
}

/// Implements the block-aware text algorithm of §4.2: text nodes collapse
/// internal whitespace runs, `<br>` inserts a newline without descending,
/// block tags insert a trailing newline after their children are processed,
/// and the whole accumulated string is finally normalized.
pub(crate) fn block_aware_text(node: NodeRef<'_>) -> String {
    let mut raw = String::new();
    walk_block_text(node, &mut raw);
    normalize_block_text(&raw)
}

fn walk_block_text(node: NodeRef<'_>, out: &mut String) {
    if node.is_text() {
        out.push_str(node.text().as_ref());
        return;
    }
    if !node.is_element() {
        return;
    }
    let tag = node.node_name().map(|n| n.to_lowercase()).unwrap_or_default();
    if tag == "br" {
        out.push('\n');
        return;
    }

    let mut child = node.first_child();
    while let Some(c) = child {
        walk_block_text(c, out);
        child = c.next_sibling();
    }

    if BLOCK_TAGS.contains(&tag.as_str()) {
        out.push('\n');
    }
}

/// Step 5 of §4.2: collapse `\n` runs, collapse space runs, drop space
/// adjacent to a newline, trim the ends.
pub(crate) fn normalize_block_text(raw: &str) -> String {
    let mut collapsed_ws = String::with_capacity(raw.len());
    let mut last_was_space = false;
    for ch in raw.chars() {
        if ch == '\n' {
            collapsed_ws.push('\n');
            last_was_space = false;
        } else if ch.is_whitespace() {
            if !last_was_space {
                collapsed_ws.push(' ');
            }
            last_was_space = true;
        } else {
            collapsed_ws.push(ch);
            last_was_space = false;
        }
    }

    let mut lines_merged = String::with_capacity(collapsed_ws.len());
    let mut prev_newline = false;
    for ch in collapsed_ws.chars() {
        if ch == '\n' {
            if !prev_newline {
                lines_merged.push('\n');
            }
            prev_newline = true;
        } else {
            lines_merged.push(ch);
            prev_newline = false;
        }
    }

    let despaced: String = lines_merged
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    despaced.trim().to_string()
}
