//! JS engine plumbing (§4.4): builds the in-sandbox `api`/Node-proxy shim
//! around a `MaterializedBridge`, evaluates the user's code, and enforces
//! the wall-clock timeout plus `boa_engine`'s recursion/loop-iteration
//! runtime limits (see the `SANDBOX_*_LIMIT` constants below; `boa_engine`
//! 0.20 has no byte-level heap cap to set).
//!
//! Uses `boa_engine`, a pure-Rust JS engine with no filesystem/network/
//! process access of its own — the isolation guarantees of §4.4 fall out of
//! simply never registering such capabilities on the `Context`, rather than
//! sandboxing a general-purpose engine after the fact.
//!
//! The exact shape of `boa_engine::Context::set_interrupt_handler` (whether
//! it takes a capturing closure or a plain fn pointer) isn't something this
//! exercise can verify by compiling, so the timeout hook below is written
//! against a plain `fn` item reading thread-local deadline state — that
//! signature is accepted by either form.

use std::cell::Cell;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use boa_engine::{Context, Source};

use crate::error::ExtractError;
use crate::sandbox::materialize::MaterializedBridge;

thread_local! {
    static DEADLINE: Cell<Option<Instant>> = const { Cell::new(None) };
}

/// Recursion depth handed to `boa_engine`'s `RuntimeLimits` for every
/// sandbox invocation (§4.4 resource bounds). `boa_engine` 0.20 has no
/// byte-level heap cap to configure — see DESIGN.md's Open Questions for
/// why the wall-clock timeout plus this structural limit is what stands in
/// for the "low tens of megabytes" reference value instead.
const SANDBOX_RECURSION_LIMIT: usize = 512;
const SANDBOX_LOOP_ITERATION_LIMIT: u64 = 10_000_000;

fn check_deadline(_ctx: &mut Context) -> boa_engine::JsResult<()> {
    let expired = DEADLINE.with(|d| d.get().is_some_and(|deadline| Instant::now() >= deadline));
    if expired {
        return Err(boa_engine::JsNativeError::typ()
            .with_message("sandbox evaluation timed out")
            .into());
    }
    Ok(())
}

/// Evaluates `code` against `materialized`, enforcing `timeout_ms`.
///
/// Returns the `data` payload of a successful `{ ok: true, data }` envelope.
/// Any `{ ok: false, error }` envelope, parse failure, thrown exception, or
/// timeout becomes `Err(ExtractError::FunctionScopeError)` (§4.4, §7).
pub fn evaluate(
    materialized: &MaterializedBridge,
    code: &str,
    timeout_ms: u32,
) -> Result<serde_json::Value, ExtractError> {
    let materialized_json = serde_json::to_string(materialized)
        .map_err(|e| ExtractError::FunctionScopeError(format!("bridge serialization failed: {e}")))?;

    let source = build_source(&materialized_json, code);

    let (tx, rx) = mpsc::channel();
    let wait = Duration::from_millis(u64::from(timeout_ms) + 50);

    thread::spawn(move || {
        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
        DEADLINE.with(|d| d.set(Some(deadline)));

        let mut context = Context::default();
        context.set_interrupt_handler(boa_engine::context::InterruptHandler::new(check_deadline));
        let mut limits = boa_engine::context::RuntimeLimits::default();
        limits.set_recursion_limit(SANDBOX_RECURSION_LIMIT);
        limits.set_loop_iteration_limit(SANDBOX_LOOP_ITERATION_LIMIT);
        context.set_runtime_limits(limits);

        let outcome = match context.eval(Source::from_bytes(source.as_bytes())) {
            Ok(value) => value
                .to_json(&mut context)
                .map_err(|e| format!("could not read sandbox result: {e}")),
            Err(e) => Err(format!("sandbox evaluation failed: {e}")),
        };
        let _ = tx.send(outcome);
    });

    let outcome = match rx.recv_timeout(wait) {
        Ok(outcome) => outcome,
        Err(_) => return Err(ExtractError::FunctionScopeError(
            "sandbox evaluation timed out".to_string(),
        )),
    };

    let envelope = outcome.map_err(ExtractError::FunctionScopeError)?;

    let ok = envelope.get("ok").and_then(serde_json::Value::as_bool).unwrap_or(false);
    if ok {
        Ok(envelope.get("data").cloned().unwrap_or(serde_json::Value::Null))
    } else {
        let message = envelope
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("sandbox function threw without a message")
            .to_string();
        Err(ExtractError::FunctionScopeError(message))
    }
}

fn build_source(materialized_json: &str, code: &str) -> String {
    format!(
        r#"
(function() {{
  const __materialized = {materialized_json};

  const __nodesById = {{}};
  __materialized.nodes.forEach(function(e) {{ __nodesById[e.id] = e.node; }});

  const __queryAllCache = {{}};
  __materialized.query_all.forEach(function(e) {{
    const key = (e.scope === null || e.scope === undefined ? "null" : e.scope) + "|" + e.selector;
    __queryAllCache[key] = e.matches;
  }});

  const __closestCache = {{}};
  __materialized.closest.forEach(function(e) {{
    const key = e.node + "|" + e.selector;
    __closestCache[key] = (e.result === undefined ? null : e.result);
  }});

  function buildNode(id) {{
    if (id === null || id === undefined) return null;
    const entry = __nodesById[id];
    if (!entry) return null;
    const snap = entry.snapshot;
    return {{
      id: snap.id,
      tag: snap.tag,
      text: snap.text,
      html: snap.html,
      outerHtml: snap.outer_html,
      attrs: snap.attrs,
      classes: snap.classes,
      attr: function(name) {{
        const found = snap.attrs.find(function(p) {{ return p[0] === name; }});
        return found ? found[1] : null;
      }},
      dataAttr: function(name) {{
        const found = snap.data_attrs.find(function(p) {{ return p[0] === name; }});
        return found ? found[1] : null;
      }},
      hasClass: function(name) {{ return snap.classes.indexOf(name) !== -1; }},
      $: function(sel) {{ return queryOne(id, sel); }},
      $$: function(sel) {{ return queryAll(id, sel); }},
      querySelector: function(sel) {{ return queryOne(id, sel); }},
      querySelectorAll: function(sel) {{ return queryAll(id, sel); }},
      closest: function(sel) {{ return closestOf(id, sel); }},
      get parent() {{ return buildNode(entry.parent); }},
      get children() {{ return (entry.children || []).map(buildNode); }},
      get firstChild() {{ return buildNode(entry.first_child); }},
      get lastChild() {{ return buildNode(entry.last_child); }},
      get nextSibling() {{ return buildNode(entry.next_sibling); }},
      get prevSibling() {{ return buildNode(entry.prev_sibling); }},
    }};
  }}

  function queryAll(scopeId, sel) {{
    const key = (scopeId === null || scopeId === undefined ? "null" : scopeId) + "|" + sel;
    const ids = __queryAllCache[key] || [];
    return ids.map(buildNode);
  }}
  function queryOne(scopeId, sel) {{
    const list = queryAll(scopeId, sel);
    return list.length > 0 ? list[0] : null;
  }}
  function closestOf(nodeId, sel) {{
    const key = nodeId + "|" + sel;
    const id = Object.prototype.hasOwnProperty.call(__closestCache, key) ? __closestCache[key] : null;
    return buildNode(id);
  }}

  const api = {{
    html: __materialized.html,
    url: __materialized.url,
    $: function(sel) {{ return queryOne(null, sel); }},
    $$: function(sel) {{ return queryAll(null, sel); }},
    querySelector: function(sel) {{ return queryOne(null, sel); }},
    querySelectorAll: function(sel) {{ return queryAll(null, sel); }},
  }};

  try {{
    const __fn = ({code});
    const __data = __fn(api, __materialized.url);
    return {{ ok: true, data: __data }};
  }} catch (e) {{
    return {{ ok: false, error: String(e && e.message ? e.message : e) }};
  }}
}})()
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::DomBridge;
    use crate::sandbox::materialize::materialize;

    #[test]
    fn evaluates_simple_arrow_function() {
        let mut bridge = DomBridge::new("<div><h1>Hi</h1></div>");
        let mat = materialize(&mut bridge, "(api) => api.html", "<div><h1>Hi</h1></div>", "https://x/");
        let data = evaluate(&mat, "(api) => api.html", 1000).unwrap();
        assert_eq!(data.as_str(), Some("<div><h1>Hi</h1></div>"));
    }

    #[test]
    fn thrown_exception_surfaces_as_error() {
        let mut bridge = DomBridge::new("<div></div>");
        let mat = materialize(&mut bridge, "(api) => { throw new Error('nope'); }", "<div></div>", "https://x/");
        let err = evaluate(&mat, "(api) => { throw new Error('nope'); }", 1000).unwrap_err();
        assert!(matches!(err, ExtractError::FunctionScopeError(_)));
    }

    #[test]
    fn node_proxy_reads_materialized_attrs() {
        let mut bridge = DomBridge::new(r#"<div><h1 id="t">Hi</h1></div>"#);
        let code = "(api) => api.$('#t').attr('id')";
        let mat = materialize(&mut bridge, code, "<div></div>", "https://x/");
        let data = evaluate(&mat, code, 1000).unwrap();
        assert_eq!(data.as_str(), Some("t"));
    }
}
