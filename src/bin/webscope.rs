//! CLI reference client (§6 "CLI surface (reference)").
//!
//! Not part of the core contract — implementers are free to expose
//! extraction however they like; this is the interoperable reference shape.

use std::io::Read as _;

use clap::Parser;
use webscope::{extract_with_scope, parse_scope, scope_to_string, Format};

/// Extract scoped content from an HTML document.
#[derive(Parser, Debug)]
#[command(name = "webscope")]
#[command(version)]
struct Args {
    /// HTML input file; omit to read from stdin.
    input: Option<String>,

    /// `main | full | auto | selector:<csv> | <json>`.
    #[arg(short = 's', long = "scope", default_value = "main")]
    scope: String,

    /// Comma-separated exclude selectors, only meaningful with `selector:`.
    #[arg(short = 'x', long = "exclude")]
    exclude: Option<String>,

    /// `html | markdown | text`.
    #[arg(short = 'f', long = "format", default_value = "html")]
    format: String,

    /// The page's own URL (used by `Function`/`Auto` scopes and plugins).
    #[arg(long = "url", default_value = "")]
    url: String,

    /// Surface the returned `ScopeResolution` on stderr.
    #[arg(long)]
    debug: bool,
}

fn parse_format(s: &str) -> Result<Format, String> {
    match s {
        "html" => Ok(Format::Html),
        "markdown" => Ok(Format::Markdown),
        "text" => Ok(Format::Text),
        other => Err(format!("unknown format: {other:?}")),
    }
}

fn read_input(path: Option<&str>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let html = read_input(args.input.as_deref()).map_err(|e| e.to_string())?;
    let scope = parse_scope(&args.scope, args.exclude.as_deref()).map_err(|e| e.to_string())?;
    let format = parse_format(&args.format)?;

    let result = extract_with_scope(&html, &scope, format, &args.url, None).map_err(|e| e.to_string())?;

    if args.debug {
        eprintln!(
            "requested={} used={} resolved={} handler_id={:?}",
            scope_to_string(&result.resolution.requested),
            scope_to_string(&result.resolution.used),
            result.resolution.resolved,
            result.resolution.handler_id,
        );
    }

    println!("{}", result.content);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
