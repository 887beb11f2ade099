//! HTTP fetching collaborator (§6 `fetch_html`). The core never performs
//! HTTP itself; this module exists for CLI/server callers that need to
//! turn a URL into HTML before calling into the core.

/// Result of fetching one URL.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The URL that was actually requested.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Whether the response was itself a redirect (never followed, per
    /// the Non-goals — redirects are surfaced, not chased).
    pub redirect: bool,
    /// Response headers, verbatim.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

/// Fetches HTML for a URL. Implementations never follow redirects (§1
/// Non-goals); a redirect response is surfaced via `FetchResult::redirect`.
pub trait Fetcher {
    /// Performs one GET request for `url`.
    ///
    /// # Errors
    /// Returns `ExtractError::Fetch` if the request cannot be completed.
    fn fetch_html(&self, url: &str) -> Result<FetchResult, crate::error::ExtractError>;
}

#[cfg(feature = "fetch")]
pub use reqwest_fetcher::ReqwestFetcher;

#[cfg(feature = "fetch")]
mod reqwest_fetcher {
    use super::{FetchResult, Fetcher};
    use crate::error::ExtractError;

    /// A `Fetcher` backed by a blocking `reqwest::Client` with redirect
    /// following disabled (§1 Non-goals).
    pub struct ReqwestFetcher {
        client: reqwest::blocking::Client,
    }

    impl ReqwestFetcher {
        /// Builds a client that never follows redirects.
        ///
        /// # Errors
        /// Returns `ExtractError::Fetch` if the underlying TLS/client
        /// setup fails.
        pub fn new() -> Result<Self, ExtractError> {
            let client = reqwest::blocking::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .map_err(|e| ExtractError::Fetch(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl Fetcher for ReqwestFetcher {
        fn fetch_html(&self, url: &str) -> Result<FetchResult, ExtractError> {
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| ExtractError::Fetch(e.to_string()))?;

            let status = response.status().as_u16();
            let redirect = (300..400).contains(&status);
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        v.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            let body = response
                .text()
                .map_err(|e| ExtractError::Fetch(e.to_string()))?;

            Ok(FetchResult {
                url: url.to_string(),
                status,
                redirect,
                headers,
                body,
            })
        }
    }
}
