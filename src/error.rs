//! Error types for scoped content extraction.
//!
//! Mirrors the teacher crate's single `thiserror` enum per concern: one
//! `ExtractError` covers everything the core contract (§7) names as a
//! client-visible failure. `ParseNoOp` and `InvalidSelector` from the spec's
//! error taxonomy are deliberately absent here — they are not errors, they
//! are silently-absorbed states handled at the call site (empty `Selection`,
//! empty output).

/// Error type for scope resolution, extraction, and the sandbox boundary.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Scope input was malformed: unknown `type`, empty `include`, out of
    /// range `timeout`, etc. (§4.5, §6).
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// The sandbox rejected the code before evaluation, timed out, threw, or
    /// produced a value that failed the Function-scope contract (§4.4).
    #[error("function scope error: {0}")]
    FunctionScopeError(String),

    /// A `Handler` scope (or an `Auto` scope with no fallback) could not be
    /// resolved because no handler-lookup collaborator was supplied, or it
    /// returned nothing for this id (§4.2, §6).
    #[error("handler unavailable: {0}")]
    HandlerUnavailable(String),

    /// The configured `Fetcher` collaborator failed to retrieve a URL.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The configured `ResultStore` collaborator failed to read or write.
    #[error("store error: {0}")]
    Store(String),

    /// I/O failure in a CLI/server shell (reading stdin, a file, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
