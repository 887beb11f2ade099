//! Core data model: `Scope`, `Format`, resolution records, and extraction
//! output (§3).

use serde::{Deserialize, Serialize};

/// Stable numeric identifier assigned to an element by a `DomBridge`.
///
/// Monotonic from 1 for the lifetime of one bridge; meaningless against any
/// other bridge instance (§3).
pub type NodeId = u64;

/// A tagged scope specification (§3).
///
/// `scope_to_string`/`parse_scope` (§4.5, §6) round-trip every variant
/// except `Function`, for which only `code` needs to compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// The page's primary content region, after noise removal.
    Main,
    /// Everything under `<body>`, after minimal cleanup only.
    Full,
    /// Defers to a handler lookup; degrades to `Main` if none resolves.
    Auto,
    /// A CSS-selector scope with required includes and optional excludes.
    Selector {
        /// Non-empty list of include selectors.
        include: Vec<String>,
        /// Selectors whose matches are removed from each include match.
        exclude: Option<Vec<String>>,
    },
    /// A sandboxed JavaScript extraction function.
    Function {
        /// Source code of a `(api, url) => ...` or `function` expression.
        code: String,
        /// Wall-clock timeout in `[1, 60000]` ms.
        timeout_ms: u32,
    },
    /// Resolution delegated entirely to a handler-lookup collaborator.
    Handler {
        /// Handler identifier, opaque to the core.
        id: String,
    },
}

/// Default timeout for a `Function` scope when none is specified (§3).
pub const DEFAULT_FUNCTION_TIMEOUT_MS: u32 = 5000;

/// Inclusive bounds on `Function.timeout_ms` (§3).
pub const FUNCTION_TIMEOUT_RANGE: std::ops::RangeInclusive<u32> = 1..=60_000;

impl Scope {
    /// A short tag identifying the variant, used for the JSON wire format
    /// and for log lines (`scope_to_string`).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Scope::Main => "main",
            Scope::Full => "full",
            Scope::Auto => "auto",
            Scope::Selector { .. } => "selector",
            Scope::Function { .. } => "function",
            Scope::Handler { .. } => "handler",
        }
    }
}

/// One of the three textual formats the Format Pipeline produces (§3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Return the extracted HTML fragment unchanged.
    Html,
    /// Convert the fragment to GitHub-flavored Markdown.
    Markdown,
    /// Normalize the fragment (or sandbox-provided fallback) to plain text.
    Text,
}

/// Record of how a requested scope was actually resolved (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeResolution {
    /// The scope as originally requested.
    pub requested: Scope,
    /// The scope that was actually applied.
    pub used: Scope,
    /// True iff `requested = Auto` and resolution replaced it.
    pub resolved: bool,
    /// The handler id consulted, if any.
    pub handler_id: Option<String>,
}

/// The output of one extraction call (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// The extracted content in the requested format.
    pub content: String,
    /// How the requested scope was resolved.
    pub resolution: ScopeResolution,
}

/// A single `hreflang` alternate link (§4.6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HrefLang {
    /// The `hreflang` attribute value.
    pub lang: String,
    /// The `href` attribute value.
    pub url: String,
}

/// Open Graph metadata subset (§4.6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    /// `og:title`.
    pub title: Option<String>,
    /// `og:description`.
    pub description: Option<String>,
    /// `og:image`.
    pub image: Option<String>,
    /// `og:url`.
    pub url: Option<String>,
    /// `og:type`.
    pub r#type: Option<String>,
    /// `og:site_name`.
    pub site_name: Option<String>,
}

/// Page-level metadata extracted from `<head>` (§3, §4.6).
///
/// All scalar fields are explicit `None` when absent; list fields default
/// to empty, never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    /// First `<title>`, trimmed.
    pub title: Option<String>,
    /// `<meta name="description" content>`.
    pub description: Option<String>,
    /// `<meta name="keywords" content>`.
    pub keywords: Option<String>,
    /// `<link rel="canonical" href>`.
    pub canonical: Option<String>,
    /// Raw `<meta name="robots" content>` value.
    pub robots: Option<String>,
    /// `false` iff `robots` (lowercased) contains `"noindex"`.
    pub index: bool,
    /// First `<h1>`, trimmed.
    pub heading: Option<String>,
    /// `<link rel="alternate" hreflang=… href=…>` with both attributes present.
    pub hreflang: Vec<HrefLang>,
    /// Open Graph tags.
    pub opengraph: OpenGraph,
}
