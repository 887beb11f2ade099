//! Ordered outbound-link inventory, with `href`s resolved to absolute URLs
//! via the `url` crate and the teacher's own `url_utils::create_absolute_url`
//! resolution rules.

use url::Url;

use super::DataPlugin;
use crate::bridge::DomBridge;

/// Collects every `<a href>` in document order, resolving relative hrefs
/// against `base`.
pub struct LinksPlugin {
    base: Option<Url>,
}

impl LinksPlugin {
    /// `base_url` is the page's own URL, used to resolve relative `href`s.
    /// An unparsable `base_url` degrades to leaving every `href` as-is.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: Url::parse(base_url).ok(),
        }
    }
}

impl DataPlugin for LinksPlugin {
    fn name(&self) -> &'static str {
        "links"
    }

    fn run(&self, bridge: &mut DomBridge) -> serde_json::Value {
        let anchors = bridge.query_all("a");
        let items: Vec<serde_json::Value> = anchors
            .iter()
            .filter_map(|a| {
                let href = a.attr("href")?;
                let resolved = match &self.base {
                    Some(base) => crate::url_utils::create_absolute_url(href, base),
                    None => href.to_string(),
                };
                Some(serde_json::json!({
                    "href": resolved,
                    "text": a.text,
                }))
            })
            .collect();
        serde_json::Value::Array(items)
    }
}
