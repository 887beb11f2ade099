//! URL Utility Functions
//!
//! This module ports URL utilities from go-trafilatura's url.go.
//! It provides URL validation, resolution, and extraction utilities
//! needed for handling relative URLs in metadata and content.

use url::Url;

/// Check if a string is a valid absolute URL.
///
/// Go equivalent: `isAbsoluteURL(s)` (lines 15-35)
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            // Verify it has a host
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Convert a relative or absolute URL to absolute form.
///
/// Go equivalent: `createAbsoluteURL(url, base)` (lines 37-75)
///
/// # Arguments
/// * `url_str` - The URL to resolve (can be relative or absolute)
/// * `base` - The base URL for resolution
///
/// # Returns
/// * The absolute URL string, or the original if resolution fails
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    // Preserve special URLs unchanged
    if url_str.starts_with("data:")
        || url_str.starts_with("javascript:")
        || url_str.starts_with("mailto:")
        || url_str.starts_with("tel:")
    {
        return url_str.to_string();
    }

    // If already absolute, return as-is
    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    // Resolve relative URL against base
    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Extract the hostname (domain) from a URL.
///
/// Go equivalent: `getDomainURL(url)` (lines 77-90)
///
/// # Returns
/// * The hostname, or empty string if invalid
#[must_use]
pub fn get_domain_url(url_str: &str) -> String {
    let (is_abs, parsed) = is_absolute_url(url_str);

    if !is_abs {
        return String::new();
    }

    parsed
        .and_then(|url| url.host_str().map(std::string::ToString::to_string))
        .unwrap_or_default()
}

/// Extract hostname from URL for metadata.
///
/// This is a convenience wrapper that handles URL parsing.
#[must_use]
pub fn extract_hostname(url_str: &str) -> Option<String> {
    let domain = get_domain_url(url_str);
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}
