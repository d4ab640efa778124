//! SplitScreen RPC Server: JSON-RPC over stdin/stdout for the native shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"favorites.toggle", "params":{"url":"...","title":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; filter with `RUST_LOG`.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use splitscreen::app::App;
use splitscreen::rpc_handler::handle_method;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("splitscreen=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn respond(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() -> ExitCode {
    init_logging();

    let app = match App::open_default() {
        Ok(app) => Mutex::new(app),
        Err(e) => {
            error!(error = %e, "failed to initialize SplitScreen");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if respond(&mut out, &ready).is_err() {
        return ExitCode::FAILURE;
    }
    info!("rpc server ready");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                let params = req.get("params").cloned().unwrap_or(json!({}));
                match handle_method(&app, method, &params) {
                    Ok(val) => json!({"id": id, "result": val}),
                    Err(err) => json!({"id": id, "error": err}),
                }
            }
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
        };

        if respond(&mut out, &response).is_err() {
            break;
        }
    }

    if let Ok(mut app) = app.into_inner() {
        app.shutdown();
    }
    ExitCode::SUCCESS
}
