//! Library-level configuration (§2.3), following `Options` in spirit: a
//! plain public struct with `Default`, no builder macro.

/// Tunable knobs that don't change scope/format *semantics* (§3), only the
/// fine detail of how the Format Pipeline and `Main`-scope container
/// selection behave.
///
/// # Example
///
/// ```rust
/// use webscope::ExtractOptions;
///
/// let options = ExtractOptions {
///     preserve_tables: false,
///     ..ExtractOptions::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Minimum `block_aware_text` length (in characters) a `Main`-scope
    /// container candidate must reach to qualify (§4.2).
    ///
    /// Default: `100`
    pub min_main_content_len: usize,

    /// Preserve `<table>` structure when converting to Markdown.
    ///
    /// Default: `true`
    pub preserve_tables: bool,

    /// Include link targets (`[text](href)`) when converting to Markdown.
    ///
    /// Default: `true`
    pub include_links: bool,

    /// Include image references (`![alt](src)`) when converting to Markdown.
    ///
    /// Default: `true`
    pub include_images: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_main_content_len: crate::extractor::removal::MAIN_MIN_CONTENT_LEN,
            preserve_tables: true,
            include_links: true,
            include_images: true,
        }
    }
}
