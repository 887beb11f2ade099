//! Capability-restricted JavaScript sandbox for the `Function` scope (§4.4).
//!
//! Isolation comes from what the engine is simply never given: `boa_engine`
//! has no built-in network, filesystem, process, or timer-that-schedules-
//! work access, so the sandbox doesn't need to strip those out of a
//! general-purpose runtime. What this module adds on top is the resource
//! bound (wall-clock timeout, §4.4) and the host bridge (read-only `api`
//! object backed by a pre-materialized snapshot of the queries the code
//! statically appears to make).

mod engine;
mod materialize;
mod validate;

use crate::bridge::DomBridge;
use crate::error::ExtractError;

/// Runs a `Function` scope's code against `bridge` and returns the
/// extracted content as a string, already converted per §4.2's rule:
/// objects become pretty-printed JSON, `null`/`undefined` become the empty
/// string, everything else is passed through as its natural string form.
pub fn run(
    bridge: &mut DomBridge,
    html: &str,
    url: &str,
    code: &str,
    timeout_ms: u32,
) -> Result<String, ExtractError> {
    validate::validate_code(code)?;
    let materialized = materialize::materialize(bridge, code, html, url);
    let data = engine::evaluate(&materialized, code, timeout_ms)?;
    Ok(data_to_string(&data))
}

/// Converts a sandbox return value to the extracted content string (§4.2
/// `Function` scope).
fn data_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
        other => other.to_string(),
    }
}
