//! # webscope
//!
//! Scoped web-content extraction: a host DOM bridge, a capability-restricted
//! JavaScript sandbox for user-defined extraction scopes, a scope resolver,
//! and a format pipeline (HTML/Markdown/Text).
//!
//! ## Quick start
//!
//! ```rust
//! use webscope::{extract_with_scope, Scope, Format};
//!
//! let html = "<html><body><article>Main content here, long enough to qualify as the primary region of this page for extraction purposes today.</article></body></html>";
//! let result = extract_with_scope(html, &Scope::Main, Format::Html, "https://example.com/", None)?;
//! assert!(result.content.contains("Main content"));
//! # Ok::<(), webscope::ExtractError>(())
//! ```
//!
//! ## Layout
//!
//! - [`bridge`] — the Host DOM Bridge: stable element ids over a parsed document.
//! - [`extractor`] — the Extraction Engine: scope dispatch and noise removal.
//! - [`format`] — the Format Pipeline: HTML/Markdown/Text conversion.
//! - [`sandbox`] — the capability-restricted JS sandbox for `Function` scopes.
//! - [`resolver`] — parses CLI/JSON scope input into a [`Scope`].
//! - [`metadata`] — extracts [`PageMeta`] from a document's `<head>`.
//! - [`options`] — [`ExtractOptions`], the library's one piece of tunable config.
//! - [`fetch`], [`handlers`], [`store`], [`plugins`] — ambient collaborators
//!   used by the CLI/server shells, never by the core extraction path.

mod error;

pub mod bridge;
pub mod dom;
pub mod extractor;
pub mod fetch;
pub mod format;
pub mod handlers;
pub mod markdown;
pub mod metadata;
pub mod options;
pub mod plugins;
pub mod resolver;
pub mod sandbox;
pub mod scope;
pub mod store;
pub mod url_utils;

pub use error::{ExtractError, Result};
pub use metadata::parse_meta;
pub use options::ExtractOptions;
pub use resolver::{parse_scope, scope_to_string};
pub use scope::{
    ExtractionResult, Format, HrefLang, NodeId, OpenGraph, PageMeta, Scope, ScopeResolution,
};

use bridge::DomBridge;
use handlers::HandlerLookup;

/// Extracts `scope` from `html` and renders it as `format`, using
/// [`ExtractOptions::default`] (§6 `extract_with_scope`).
///
/// `handler_lookup` backs the `Auto`/`Handler` scopes; without one, `Auto`
/// degrades to `Main` and `Handler` fails with `HandlerUnavailable`.
///
/// # Errors
/// See [`ExtractError`] for the full taxonomy (§7).
pub fn extract_with_scope(
    html: &str,
    scope: &Scope,
    format: Format,
    url: &str,
    handler_lookup: Option<&dyn HandlerLookup>,
) -> Result<ExtractionResult> {
    extract_with_options(html, scope, format, url, handler_lookup, &ExtractOptions::default())
}

/// As [`extract_with_scope`], with explicit [`ExtractOptions`] (§2.3).
///
/// # Errors
/// See [`ExtractError`] for the full taxonomy (§7).
pub fn extract_with_options(
    html: &str,
    scope: &Scope,
    format: Format,
    url: &str,
    handler_lookup: Option<&dyn HandlerLookup>,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    log::debug!("extracting scope={} url={}", resolver::scope_to_string(scope), url);
    let mut bridge = DomBridge::new(html);
    let output = extractor::extract(&mut bridge, scope, url, handler_lookup, options)?;
    let content = format::render(&output, format, options);
    log::trace!(
        "resolved scope used={} resolved={}",
        resolver::scope_to_string(&output.resolution.used),
        output.resolution.resolved
    );
    Ok(ExtractionResult {
        content,
        resolution: output.resolution,
    })
}
