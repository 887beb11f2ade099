//! Pre-materialized bridge strategy (§4.4, item 2).
//!
//! Statically scans the sandboxed code for literal selector arguments to
//! `$`, `$$`, `querySelector`, `querySelectorAll`, `closest`, pre-executes
//! each one against the `DomBridge`, and recursively snapshots every
//! related node (parent, children, first/last child, next/prev sibling) so
//! the in-sandbox proxy objects can answer without crossing back into host
//! code. A selector the static scan can't see (built from a variable, or
//! discovered only at runtime) simply misses the cache; per §4.4 that's a
//! documented "uncached lookup returns null/empty", not a bug.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bridge::{DomBridge, NodeSnapshot};
use crate::scope::NodeId;

/// Hard cap on how many distinct nodes one materialization will capture,
/// so a pathological selector (or a huge document) can't make sandbox
/// setup itself unbounded.
const MAX_MATERIALIZED_NODES: usize = 2000;

static CALL_SITES: &[&str] = &["$", "$$", "querySelector", "querySelectorAll", "closest"];

static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'((?:[^'\\]|\\.)*)'").expect("static regex is valid")
});
static DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("static regex is valid")
});

/// One node's cached relationships, by id (keys into `MaterializedBridge::nodes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializedNode {
    pub snapshot: NodeSnapshot,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
}

/// One entry of `MaterializedBridge::nodes`. A plain `(id, node)` pair
/// rather than a map, because `serde_json` cannot serialize a map whose
/// keys aren't strings, and `NodeId` is numeric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: NodeId,
    pub node: MaterializedNode,
}

/// One `$$`/`querySelectorAll` cache entry. `scope = None` is a
/// document-root query (`api.$$`), `Some(id)` a node-scoped one
/// (`node.$$`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAllEntry {
    pub scope: Option<NodeId>,
    pub selector: String,
    pub matches: Vec<NodeId>,
}

/// One `closest` cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosestEntry {
    pub node: NodeId,
    pub selector: String,
    pub result: Option<NodeId>,
}

/// The plain-data snapshot injected into the sandbox (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializedBridge {
    pub html: String,
    pub url: String,
    pub nodes: Vec<NodeEntry>,
    pub query_all: Vec<QueryAllEntry>,
    pub closest: Vec<ClosestEntry>,
}

/// Extracts every literal (single- or double-quoted) selector argument
/// passed to a call-site the sandbox exposes.
fn extract_literal_selectors(code: &str) -> Vec<String> {
    let mut out = Vec::new();
    for site in CALL_SITES {
        let needle = format!(".{site}(");
        let mut search_from = 0;
        while let Some(rel) = code[search_from..].find(&needle) {
            let call_start = search_from + rel + needle.len();
            let rest = &code[call_start..];
            let rest_trimmed = rest.trim_start();
            if let Some(cap) = SINGLE_QUOTED.captures(rest_trimmed) {
                if rest_trimmed.starts_with('\'') {
                    out.push(cap[1].to_string());
                }
            } else if let Some(cap) = DOUBLE_QUOTED.captures(rest_trimmed) {
                if rest_trimmed.starts_with('"') {
                    out.push(cap[1].to_string());
                }
            }
            search_from = call_start;
        }
    }
    out.sort();
    out.dedup();
    out
}

fn register(
    bridge: &mut DomBridge,
    snap: NodeSnapshot,
    nodes: &mut HashMap<NodeId, MaterializedNode>,
    frontier: &mut Vec<NodeId>,
) {
    if nodes.len() >= MAX_MATERIALIZED_NODES || nodes.contains_key(&snap.id) {
        return;
    }
    let id = snap.id;

    let parent = bridge.parent(id, None);
    let children = bridge.children(id);
    let first_child = bridge.first_child(id);
    let last_child = bridge.last_child(id);
    let next_sibling = bridge.next_sibling(id);
    let prev_sibling = bridge.prev_sibling(id);

    let related: Vec<NodeSnapshot> = parent
        .clone()
        .into_iter()
        .chain(children.clone())
        .chain(first_child.clone())
        .chain(last_child.clone())
        .chain(next_sibling.clone())
        .chain(prev_sibling.clone())
        .collect();

    nodes.insert(
        id,
        MaterializedNode {
            snapshot: snap,
            parent: parent.map(|s| s.id),
            children: children.iter().map(|s| s.id).collect(),
            first_child: first_child.map(|s| s.id),
            last_child: last_child.map(|s| s.id),
            next_sibling: next_sibling.map(|s| s.id),
            prev_sibling: prev_sibling.map(|s| s.id),
        },
    );
    frontier.push(id);

    for related_snap in related {
        register(bridge, related_snap, nodes, frontier);
    }
}

/// Runs the full pre-materialization pass: scan `code`, execute every
/// literal selector first against the document root and then against
/// every node discovered so far, until a fixed point (or the node cap).
#[must_use]
pub fn materialize(bridge: &mut DomBridge, code: &str, html: &str, url: &str) -> MaterializedBridge {
    let selectors = extract_literal_selectors(code);

    let mut nodes: HashMap<NodeId, MaterializedNode> = HashMap::new();
    let mut query_all: HashMap<(Option<NodeId>, String), Vec<NodeId>> = HashMap::new();
    let mut closest: HashMap<(NodeId, String), Option<NodeId>> = HashMap::new();

    let mut scopes_to_visit: Vec<Option<NodeId>> = vec![None];
    let mut visited_scopes: std::collections::HashSet<Option<NodeId>> = std::collections::HashSet::new();

    while let Some(scope) = scopes_to_visit.pop() {
        if !visited_scopes.insert(scope) || nodes.len() >= MAX_MATERIALIZED_NODES {
            continue;
        }

        for sel in &selectors {
            let matches = match scope {
                None => bridge.query_all(sel),
                Some(id) => bridge.child_query_all(id, sel),
            };
            let ids: Vec<NodeId> = matches.iter().map(|s| s.id).collect();

            let mut frontier = Vec::new();
            for snap in matches {
                register(bridge, snap, &mut nodes, &mut frontier);
            }
            for id in frontier {
                scopes_to_visit.push(Some(id));
            }
            query_all.insert((scope, sel.clone()), ids);

            if let Some(id) = scope {
                let found = bridge.closest(id, sel);
                let found_id = found.as_ref().map(|s| s.id);
                if let Some(snap) = found {
                    let mut frontier = Vec::new();
                    register(bridge, snap, &mut nodes, &mut frontier);
                    for id in frontier {
                        scopes_to_visit.push(Some(id));
                    }
                }
                closest.insert((id, sel.clone()), found_id);
            }
        }
    }

    MaterializedBridge {
        html: html.to_string(),
        url: url.to_string(),
        nodes: nodes
            .into_iter()
            .map(|(id, node)| NodeEntry { id, node })
            .collect(),
        query_all: query_all
            .into_iter()
            .map(|((scope, selector), matches)| QueryAllEntry {
                scope,
                selector,
                matches,
            })
            .collect(),
        closest: closest
            .into_iter()
            .map(|((node, selector), result)| ClosestEntry {
                node,
                selector,
                result,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_literal_selectors_from_dollar_calls() {
        let code = r#"(api) => { const h = api.$('h1'); return api.$$(".item").length; }"#;
        let selectors = extract_literal_selectors(code);
        assert!(selectors.contains(&"h1".to_string()));
        assert!(selectors.contains(&".item".to_string()));
    }

    #[test]
    fn materialize_finds_root_query_matches() {
        let mut bridge = DomBridge::new("<div><h1>Hi</h1></div>");
        let mat = materialize(&mut bridge, "(api) => api.$('h1').text", "<div></div>", "https://x/");
        let entry = mat
            .query_all
            .iter()
            .find(|e| e.scope.is_none() && e.selector == "h1")
            .unwrap();
        assert_eq!(entry.matches.len(), 1);
        let node = mat.nodes.iter().find(|n| n.id == entry.matches[0]).unwrap();
        assert_eq!(node.node.snapshot.tag, "h1");
    }

    #[test]
    fn uncached_selector_is_simply_absent() {
        let mut bridge = DomBridge::new("<div><h1>Hi</h1></div>");
        let mat = materialize(&mut bridge, "(api) => api.$(dynamicVar).text", "<div></div>", "https://x/");
        assert!(mat.query_all.is_empty());
    }
}
