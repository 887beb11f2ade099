//! Pre-evaluation syntactic checks (§4.4). Cheap, textual, and deliberately
//! not a security boundary — isolation is enforced by the engine, this is
//! defense-in-depth that turns obviously-wrong code into a fast, readable
//! error instead of a confusing runtime failure.

use crate::error::ExtractError;

/// Rejects code that doesn't look like a `(api, url) => ...` arrow function
/// or a `function` expression, or that references `document.`/`fetch(`.
pub fn validate_code(code: &str) -> Result<(), ExtractError> {
    let trimmed = code.trim_start();

    if trimmed.is_empty() {
        return Err(ExtractError::InvalidScope(
            "function scope code must not be empty".to_string(),
        ));
    }

    let looks_like_arrow = trimmed.starts_with('(') && trimmed.contains("=>");
    let looks_like_function =
        trimmed.starts_with("function(") || trimmed.starts_with("function (")
            || trimmed.starts_with("(function");

    if !(looks_like_arrow || looks_like_function) {
        return Err(ExtractError::FunctionScopeError(
            "code must begin with an arrow function \"(...) =>\" or a function expression"
                .to_string(),
        ));
    }

    if trimmed.contains("document.") {
        return Err(ExtractError::FunctionScopeError(
            "code may not reference `document.`; use the `api` argument instead".to_string(),
        ));
    }

    if trimmed.contains("fetch(") || trimmed.contains("await fetch") {
        return Err(ExtractError::FunctionScopeError(
            "code may not call fetch; use the `api` argument instead".to_string(),
        ));
    }

    Ok(())
}
