//! Noise-removal tag/keyword catalogs for `Main`/`Full` scope extraction
//! (§4.2).
//!
//! Modeled on the teacher's tag-catalog style (`extractor::tags`,
//! `html_processing::ALLOWED_ATTRIBUTES`): plain arrays, `LazyLock` sets for
//! O(1) lookup where membership is checked often.

use std::collections::HashSet;
use std::sync::LazyLock;

use dom_query::Document;

use crate::dom;

/// Elements removed for every scope that performs step-1 removals
/// (`Main`, `Full`, `Selector`): §4.2 step 1.
pub const GLOBAL_REMOVE_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg"];

/// Additional structural elements removed only for `Main` (§4.2 step 2).
pub const MAIN_REMOVE_TAGS: &[&str] = &["nav", "header", "footer", "aside", "form"];

/// `role` attribute values treated as noise for `Main` (§4.2 step 2).
pub const MAIN_REMOVE_ROLES: &[&str] = &["navigation", "banner", "contentinfo", "complementary"];

/// id/class keywords treated as noise for `Main` (§4.2 step 2). Matching is
/// exact-token: the whole `id` attribute, or one class token, equal to a
/// keyword here — not a substring match.
pub const MAIN_REMOVE_KEYWORDS: &[&str] = &[
    "nav", "navbar", "header", "footer", "sidebar", "menu", "advertisement", "ads", "ad",
];

/// Containers tried, in order, as the `Main` scope's content root (§4.2
/// step 3). The first whose post-removal trimmed text is >= 100 chars wins.
pub const MAIN_CONTAINER_CANDIDATES: &[&str] = &[
    "main", "[role=main]", "article", ".content", ".post", ".article", ".entry",
    "#content", "#main", ".main",
];

/// Minimum trimmed-text length (characters) a `Main` container must reach
/// to qualify (§4.2 step 3).
pub const MAIN_MIN_CONTENT_LEN: usize = 100;

static MAIN_REMOVE_ROLE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| MAIN_REMOVE_ROLES.iter().copied().collect());

static MAIN_REMOVE_KEYWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| MAIN_REMOVE_KEYWORDS.iter().copied().collect());

/// Removes `script, style, noscript, iframe, svg`, and any `<img>` whose
/// `src` begins with `data:` (§4.2 step 1; only `<img>` is filtered per the
/// recommended resolution in §9).
pub fn apply_global_removals(doc: &Document) {
    for tag in GLOBAL_REMOVE_TAGS {
        doc.select(tag).remove();
    }

    let images = doc.select("img");
    for node in images.nodes() {
        let sel = dom_query::Selection::from(*node);
        if dom::get_attribute(&sel, "src")
            .is_some_and(|src| src.trim_start().starts_with("data:"))
        {
            sel.remove();
        }
    }
}

/// Removes the additional `Main`-only structural noise: nav/header/footer/
/// aside/form, `[role=...]` noise, and elements whose id or class is an
/// exact match for one of the noise keywords (§4.2 step 2).
pub fn apply_main_noise_removal(doc: &Document) {
    for tag in MAIN_REMOVE_TAGS {
        doc.select(tag).remove();
    }

    // Collect every offending element's own Selection first: removing a
    // node while iterating the live `*` selection would invalidate the
    // nodes still to be visited (an ancestor might vanish mid-iteration).
    let mut offenders = Vec::new();
    for node in doc.select("*").nodes() {
        let sel = dom_query::Selection::from(*node);

        let is_noise_role = dom::get_attribute(&sel, "role")
            .is_some_and(|role| MAIN_REMOVE_ROLE_SET.contains(role.as_str()));
        let is_noise_id = dom::id(&sel)
            .is_some_and(|id| MAIN_REMOVE_KEYWORD_SET.contains(id.as_str()));
        let is_noise_class = dom::class_name(&sel).is_some_and(|class| {
            class
                .split_whitespace()
                .any(|token| MAIN_REMOVE_KEYWORD_SET.contains(token))
        });

        if is_noise_role || is_noise_id || is_noise_class {
            offenders.push(sel);
        }
    }

    for sel in offenders {
        // A descendant of an already-removed offender is simply gone by the
        // time its own turn comes up; `remove()` on an empty/stale
        // selection is a documented no-op (§4.1).
        sel.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_removals_strip_scripts_and_styles() {
        let doc = Document::from("<div><script>x</script><style>y</style><p>keep</p></div>");
        apply_global_removals(&doc);
        assert!(doc.select("script").is_empty());
        assert!(doc.select("style").is_empty());
        assert!(!doc.select("p").is_empty());
    }

    #[test]
    fn only_img_is_filtered_for_data_uris() {
        let doc = Document::from(
            r#"<div><img src="data:image/png;base64,AA=="><img src="/ok.png"></div>"#,
        );
        apply_global_removals(&doc);
        assert_eq!(doc.select("img").length(), 1);
    }

    #[test]
    fn main_noise_removal_drops_nav_and_keyword_classes() {
        let doc = Document::from(
            r#"<body><nav>skip</nav><div class="sidebar">skip2</div><main>keep</main></body>"#,
        );
        apply_main_noise_removal(&doc);
        assert!(doc.select("nav").is_empty());
        assert!(doc.select(".sidebar").is_empty());
        assert!(!doc.select("main").is_empty());
    }
}
