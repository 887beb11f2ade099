//! Ordered heading outline (`h1`..`h6`), grounded on the same
//! `DomBridge::query_all` contract the core extraction engine uses.

use super::DataPlugin;
use crate::bridge::DomBridge;

/// Collects every `h1`..`h6` in document order, each tagged with its level.
#[derive(Debug, Default)]
pub struct HeadingsPlugin;

impl DataPlugin for HeadingsPlugin {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn run(&self, bridge: &mut DomBridge) -> serde_json::Value {
        let headings = bridge.query_all("h1, h2, h3, h4, h5, h6");
        let items: Vec<serde_json::Value> = headings
            .iter()
            .map(|h| {
                let level = h.tag.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()).unwrap_or(0);
                serde_json::json!({
                    "level": level,
                    "text": h.text,
                })
            })
            .collect();
        serde_json::Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_headings_in_document_order_with_levels() {
        let mut bridge = DomBridge::new("<body><h2>B</h2><h1>A</h1></body>");
        let out = HeadingsPlugin.run(&mut bridge);
        let items = out.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["level"], 2);
        assert_eq!(items[0]["text"], "B");
        assert_eq!(items[1]["level"], 1);
        assert_eq!(items[1]["text"], "A");
    }
}
