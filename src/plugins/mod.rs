//! Data plugins (§2.9): optional, additive enrichment run against the same
//! `DomBridge` as the primary extraction. Never part of the core
//! `ExtractionResult` contract (§3) — attached separately by CLI/server
//! callers that ask for them.

mod headings;
mod links;

pub use headings::HeadingsPlugin;
pub use links::LinksPlugin;

use crate::bridge::DomBridge;

/// One optional enrichment pass over a `DomBridge`.
pub trait DataPlugin {
    /// The key this plugin's output is attached under.
    fn name(&self) -> &'static str;
    /// Runs the plugin, producing plain JSON data.
    fn run(&self, bridge: &mut DomBridge) -> serde_json::Value;
}
