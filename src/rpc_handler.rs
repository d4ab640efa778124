//! RPC method handler for the SplitScreen JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches calls to the page store, the split layout and
//! the flags engine held by [`App`]. Store writes are awaited with
//! [`PendingWrite::wait`](crate::managers::page_store::PendingWrite::wait),
//! so this must not run inside an async runtime.

use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::address_bar::normalize_input;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::page::{FavoriteToggle, PageRecord};

/// Encode bytes to base64 string.
pub fn base64_encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode base64 string to bytes.
pub fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    BASE64.decode(input).map_err(|e| format!("base64 decode error: {}", e))
}

fn record_json(r: &PageRecord) -> Value {
    json!({
        "id": r.id,
        "url": r.url,
        "title": r.title,
        "icon": base64_encode(&r.icon_data),
        "created_at": r.created_at,
        "is_favorite": r.is_favorite,
    })
}

fn records_json(records: &[PageRecord]) -> Value {
    json!({"items": records.iter().map(record_json).collect::<Vec<_>>()})
}

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn f64_param(params: &Value, key: &str) -> Result<f64, String> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| format!("missing {}", key))
}

fn page_params(params: &Value) -> Result<(&str, &str, Vec<u8>), String> {
    let url = str_param(params, "url")?;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("invalid url: must start with http:// or https://".to_string());
    }
    let title = params.get("title").and_then(|v| v.as_str()).unwrap_or("");
    let icon = match params.get("icon").and_then(|v| v.as_str()) {
        Some(encoded) => base64_decode(encoded)?,
        None => Vec::new(),
    };
    Ok((url, title, icon))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Pages ───
        "page.visit" => {
            let (url, title, icon) = page_params(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let record = a.store.record_visit(url, title, icon).wait();
            // Visit logging is best effort; a dropped write is not an RPC error.
            Ok(json!({"ok": true, "record": record.as_ref().map(record_json)}))
        }
        "page.delete" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let deleted = a.store.delete(id).wait().unwrap_or(false);
            Ok(json!({"deleted": deleted}))
        }
        "recents.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let records = a.store.fetch_recents().map_err(|e| e.to_string())?;
            Ok(records_json(&records))
        }

        // ─── Favorites ───
        "favorites.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let records = a.store.fetch_favorites().map_err(|e| e.to_string())?;
            Ok(records_json(&records))
        }
        "favorites.add" => {
            let (url, title, icon) = page_params(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let record = a
                .store
                .add_favorite(url, title, icon)
                .wait()
                .ok_or("favorite was not saved")?;
            Ok(record_json(&record))
        }
        "favorites.remove" => {
            let key = params
                .get("id")
                .or_else(|| params.get("url"))
                .and_then(|v| v.as_str())
                .ok_or("missing url or id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let removed = a.store.remove_favorite(key).wait().unwrap_or(0);
            Ok(json!({"removed": removed}))
        }
        "favorites.toggle" => {
            let (url, title, icon) = page_params(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let toggle = a
                .store
                .toggle_favorite(url, title, icon)
                .wait()
                .ok_or("favorite toggle was not saved")?;
            Ok(match toggle {
                FavoriteToggle::Added(record) => {
                    json!({"is_favorite": true, "record": record_json(&record)})
                }
                FavoriteToggle::Removed { count } => json!({"is_favorite": false, "removed": count}),
            })
        }
        "favorites.contains" => {
            let url = str_param(params, "url")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let is_favorite = a.store.is_favorite(url).map_err(|e| e.to_string())?;
            Ok(json!({"is_favorite": is_favorite}))
        }

        // ─── Layout ───
        "layout.state" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.layout.frames()).map_err(|e| e.to_string())
        }
        "layout.enter" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let show_hint = a.layout.enter();
            Ok(json!({"show_hint": show_hint}))
        }
        "layout.bounds" => {
            let width = f64_param(params, "width")?;
            let height = f64_param(params, "height")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.layout.set_bounds(width, height);
            serde_json::to_value(a.layout.frames()).map_err(|e| e.to_string())
        }
        "layout.drag_begin" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.begin_divider_drag();
            serde_json::to_value(a.layout.frames()).map_err(|e| e.to_string())
        }
        "layout.drag" => {
            let delta = f64_param(params, "delta")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let position = a.layout.drag_by(delta);
            Ok(json!({"divider_position": position}))
        }
        "layout.drag_end" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.layout.end_drag();
            Ok(json!({"ok": true}))
        }
        "layout.hint_timeout" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.hint_timed_out();
            Ok(json!({"hint": a.layout.hint()}))
        }

        // ─── Flags ───
        "flags.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "flags.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Address bar ───
        "input.normalize" => {
            let query = str_param(params, "query")?;
            Ok(json!({"url": normalize_input(query)}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
