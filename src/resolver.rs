//! Scope Resolver (§4.5): translates CLI/JSON/object input into a
//! validated `Scope`, and the inverse for logging (`scope_to_string`, §6).

use serde::Deserialize;

use crate::error::ExtractError;
use crate::scope::{Scope, DEFAULT_FUNCTION_TIMEOUT_MS, FUNCTION_TIMEOUT_RANGE};

#[derive(Deserialize)]
struct ScopeWire {
    r#type: String,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    code: Option<String>,
    timeout: Option<u32>,
    id: Option<String>,
}

/// Parses `arg` (a CLI string or a JSON scope object) into a `Scope`.
///
/// `exclude_arg`, if given, is a comma-separated exclude list combined
/// with a `"selector:"`-form `arg`; it is ignored for every other form
/// (the `{…}` and bare-keyword forms carry `exclude` inline, per §4.5).
pub fn parse_scope(arg: &str, exclude_arg: Option<&str>) -> Result<Scope, ExtractError> {
    let trimmed = arg.trim();

    match trimmed {
        "main" => return Ok(Scope::Main),
        "full" => return Ok(Scope::Full),
        "auto" => return Ok(Scope::Auto),
        _ => {}
    }

    if let Some(rest) = trimmed.strip_prefix("selector:") {
        let include = split_csv(rest);
        if include.is_empty() {
            return Err(ExtractError::InvalidScope(
                "selector scope requires at least one non-empty selector".to_string(),
            ));
        }
        let exclude = exclude_arg.map(split_csv).filter(|v| !v.is_empty());
        return Ok(Scope::Selector { include, exclude });
    }

    if trimmed.starts_with('{') {
        let wire: ScopeWire = serde_json::from_str(trimmed)
            .map_err(|e| ExtractError::InvalidScope(format!("invalid scope JSON: {e}")))?;
        return scope_from_wire(wire);
    }

    Err(ExtractError::InvalidScope(format!(
        "unrecognized scope: {trimmed:?}"
    )))
}

fn scope_from_wire(wire: ScopeWire) -> Result<Scope, ExtractError> {
    match wire.r#type.as_str() {
        "main" => Ok(Scope::Main),
        "full" => Ok(Scope::Full),
        "auto" => Ok(Scope::Auto),
        "selector" => {
            let include = wire.include.unwrap_or_default();
            if include.is_empty() {
                return Err(ExtractError::InvalidScope(
                    "selector scope requires a non-empty `include` array".to_string(),
                ));
            }
            let exclude = wire.exclude.filter(|v| !v.is_empty());
            Ok(Scope::Selector { include, exclude })
        }
        "function" => {
            let code = wire.code.unwrap_or_default();
            if code.trim().is_empty() {
                return Err(ExtractError::InvalidScope(
                    "function scope requires non-empty `code`".to_string(),
                ));
            }
            let timeout_ms = wire.timeout.unwrap_or(DEFAULT_FUNCTION_TIMEOUT_MS);
            if !FUNCTION_TIMEOUT_RANGE.contains(&timeout_ms) {
                return Err(ExtractError::InvalidScope(format!(
                    "function scope timeout must be in [1, 60000], got {timeout_ms}"
                )));
            }
            Ok(Scope::Function { code, timeout_ms })
        }
        "handler" => {
            let id = wire.id.unwrap_or_default();
            if id.is_empty() {
                return Err(ExtractError::InvalidScope(
                    "handler scope requires a non-empty `id`".to_string(),
                ));
            }
            Ok(Scope::Handler { id })
        }
        other => Err(ExtractError::InvalidScope(format!(
            "unknown scope type: {other:?}"
        ))),
    }
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders `scope` back to the wire form `parse_scope` accepts (§6, for
/// logging). `Main`/`Full`/`Auto` render as their bare keyword; every other
/// variant renders as JSON, which round-trips exactly through `parse_scope`.
#[must_use]
pub fn scope_to_string(scope: &Scope) -> String {
    match scope {
        Scope::Main => "main".to_string(),
        Scope::Full => "full".to_string(),
        Scope::Auto => "auto".to_string(),
        Scope::Selector { include, exclude } => serde_json::json!({
            "type": "selector",
            "include": include,
            "exclude": exclude,
        })
        .to_string(),
        Scope::Function { code, timeout_ms } => serde_json::json!({
            "type": "function",
            "code": code,
            "timeout": timeout_ms,
        })
        .to_string(),
        Scope::Handler { id } => serde_json::json!({
            "type": "handler",
            "id": id,
        })
        .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_keywords() {
        assert_eq!(parse_scope("main", None).unwrap(), Scope::Main);
        assert_eq!(parse_scope("full", None).unwrap(), Scope::Full);
        assert_eq!(parse_scope("auto", None).unwrap(), Scope::Auto);
    }

    #[test]
    fn parses_selector_prefix_with_exclude() {
        let scope = parse_scope("selector: #a , #b ", Some("  .ad , ")).unwrap();
        assert_eq!(
            scope,
            Scope::Selector {
                include: vec!["#a".to_string(), "#b".to_string()],
                exclude: Some(vec![".ad".to_string()]),
            }
        );
    }

    #[test]
    fn rejects_empty_selector_list() {
        assert!(parse_scope("selector:  , ", None).is_err());
    }

    #[test]
    fn parses_json_function_scope_with_default_timeout() {
        let scope = parse_scope(r#"{"type":"function","code":"(api) => api.html"}"#, None).unwrap();
        assert_eq!(
            scope,
            Scope::Function {
                code: "(api) => api.html".to_string(),
                timeout_ms: DEFAULT_FUNCTION_TIMEOUT_MS,
            }
        );
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        let err = parse_scope(
            r#"{"type":"function","code":"(api) => 1","timeout":70000}"#,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidScope(_)));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(parse_scope(r#"{"type":"bogus"}"#, None).is_err());
    }

    #[test]
    fn round_trips_selector_and_handler_through_json() {
        let scope = Scope::Selector {
            include: vec!["a".to_string()],
            exclude: Some(vec!["b".to_string()]),
        };
        let s = scope_to_string(&scope);
        assert_eq!(parse_scope(&s, None).unwrap(), scope);

        let handler = Scope::Handler { id: "x".to_string() };
        let s = scope_to_string(&handler);
        assert_eq!(parse_scope(&s, None).unwrap(), handler);
    }

    #[test]
    fn round_trips_bare_keywords() {
        for scope in [Scope::Main, Scope::Full, Scope::Auto] {
            let s = scope_to_string(&scope);
            assert_eq!(parse_scope(&s, None).unwrap(), scope);
        }
    }
}
