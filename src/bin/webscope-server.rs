//! HTTP service shell (§2.8): `POST /extract`, `GET /meta?url=...`.
//!
//! Wraps the blocking extraction/fetch path in `tokio::task::spawn_blocking`
//! so the sandbox timeout is never shortened by the server's own request
//! handling.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use webscope::fetch::{Fetcher, ReqwestFetcher};
use webscope::store::{MemoryStore, ResultStore};
use webscope::{extract_with_scope, parse_meta, parse_scope, scope_to_string, Format};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_STORE_TTL_SECS: u64 = 300;

struct ServerConfig {
    bind_addr: String,
    store_ttl: Duration,
}

impl ServerConfig {
    fn from_env() -> Self {
        let bind_addr = env::var("WEBSCOPE_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let store_ttl = env::var("WEBSCOPE_STORE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_STORE_TTL_SECS), Duration::from_secs);
        Self { bind_addr, store_ttl }
    }
}

struct AppState {
    config: ServerConfig,
    fetcher: Option<ReqwestFetcher>,
    store: MemoryStore,
}

#[derive(Debug, Deserialize)]
struct ExtractRequest {
    url: Option<String>,
    html: Option<String>,
    #[serde(default = "default_scope")]
    scope: String,
    exclude: Option<String>,
    #[serde(default = "default_format")]
    format: String,
    #[serde(default)]
    debug: bool,
}

fn default_scope() -> String {
    "main".to_string()
}

fn default_format() -> String {
    "html".to_string()
}

fn parse_format(s: &str) -> Result<Format, String> {
    match s {
        "html" => Ok(Format::Html),
        "markdown" => Ok(Format::Markdown),
        "text" => Ok(Format::Text),
        other => Err(format!("unknown format: {other:?}")),
    }
}

async fn extract_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> impl IntoResponse {
    let cache_key = format!("{}|{}|{}|{:?}", req.url.as_deref().unwrap_or(""), req.scope, req.format, req.exclude);
    if let Some(cached) = state.store.get(&cache_key) {
        return (
            StatusCode::OK,
            Json(json!({
                "content": cached.content,
                "resolution": {
                    "requested": scope_to_string(&cached.resolution.requested),
                    "used": scope_to_string(&cached.resolution.used),
                    "resolved": cached.resolution.resolved,
                    "handler_id": cached.resolution.handler_id,
                },
            })),
        );
    }

    let result = tokio::task::spawn_blocking(move || -> Result<_, String> {
        let html = match (&req.html, &req.url) {
            (Some(html), _) => html.clone(),
            (None, Some(url)) => {
                let fetcher = state
                    .fetcher
                    .as_ref()
                    .ok_or_else(|| "fetching is not configured on this server".to_string())?;
                fetcher.fetch_html(url).map_err(|e| e.to_string())?.body
            }
            (None, None) => return Err("either `url` or `html` is required".to_string()),
        };

        let scope = parse_scope(&req.scope, req.exclude.as_deref()).map_err(|e| e.to_string())?;
        let format = parse_format(&req.format)?;
        let url = req.url.clone().unwrap_or_default();

        let outcome = extract_with_scope(&html, &scope, format, &url, None).map_err(|e| e.to_string())?;
        state.store.put(&cache_key, &outcome, state.config.store_ttl);
        Ok((outcome, req.debug))
    })
    .await;

    match result {
        Ok(Ok((outcome, debug))) => {
            let mut body = json!({ "content": outcome.content });
            if debug {
                body["resolution"] = json!({
                    "requested": scope_to_string(&outcome.resolution.requested),
                    "used": scope_to_string(&outcome.resolution.used),
                    "resolved": outcome.resolution.resolved,
                    "handler_id": outcome.resolution.handler_id,
                });
            }
            (StatusCode::OK, Json(body))
        }
        Ok(Err(message)) => (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))),
        Err(join_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": join_err.to_string() })),
        ),
    }
}

#[derive(Debug, Deserialize)]
struct MetaQuery {
    url: String,
}

async fn meta_handler(State(state): State<Arc<AppState>>, Query(query): Query<MetaQuery>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || -> Result<Value, String> {
        let fetcher = state
            .fetcher
            .as_ref()
            .ok_or_else(|| "fetching is not configured on this server".to_string())?;
        let html = fetcher.fetch_html(&query.url).map_err(|e| e.to_string())?.body;
        let meta = parse_meta(&html);
        serde_json::to_value(&meta).map_err(|e| e.to_string())
    })
    .await;

    match result {
        Ok(Ok(value)) => (StatusCode::OK, Json(value)),
        Ok(Err(message)) => (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))),
        Err(join_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": join_err.to_string() })),
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = ServerConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState {
        config,
        fetcher: ReqwestFetcher::new().ok(),
        store: MemoryStore::new(),
    });

    let app = Router::new()
        .route("/extract", post(extract_handler))
        .route("/meta", get(meta_handler))
        .with_state(state);

    log::info!("listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
