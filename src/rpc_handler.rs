//! RPC method handler for the timemark JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a call to the capture agent, the panel or the
//! settings engine held by [`App`].

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::capture_agent::PresetNote;
use crate::managers::navigation_watcher::{
    ensure_present, reinject, InjectOutcome, NavigationOutcome, NavigationSignal,
};
use crate::managers::panel_renderer::ClickOrigin;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::page::PageSnapshot;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn page_param(params: &Value) -> Result<PageSnapshot, String> {
    serde_json::from_value(params.get("page").cloned().ok_or("missing page")?)
        .map_err(|e| format!("invalid page: {}", e))
}

fn parse_signal(params: &Value) -> Result<NavigationSignal, String> {
    match str_param(params, "signal")? {
        "mutation" => Ok(NavigationSignal::DocumentMutation),
        "popstate" => Ok(NavigationSignal::HistoryPopState),
        "page_ready" => Ok(NavigationSignal::PageReady),
        other => Err(format!("invalid signal: {}", other)),
    }
}

fn outcome_name(outcome: InjectOutcome) -> &'static str {
    match outcome {
        InjectOutcome::AlreadyPresent => "already_present",
        InjectOutcome::Inserted => "inserted",
        InjectOutcome::NotReady => "not_ready",
    }
}

fn parse_origin(params: &Value) -> Result<ClickOrigin, String> {
    match params.get("origin").and_then(|v| v.as_str()).unwrap_or("card") {
        "card" => Ok(ClickOrigin::Card),
        "note_editor" => Ok(ClickOrigin::NoteEditor),
        "delete_control" => Ok(ClickOrigin::DeleteControl),
        other => Err(format!("invalid origin: {}", other)),
    }
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Capture ───
        "page.capture" => {
            let page = page_param(params)?;
            let note = params.get("note").and_then(|v| v.as_str()).map(str::to_string);

            let mut a = app.lock().map_err(|e| e.to_string())?;
            let agent = a.capture_agent(Box::new(PresetNote(note)));
            let bookmark = agent.capture(&page).map_err(|e| e.to_string())?;
            a.sync_panel();
            serde_json::to_value(&bookmark).map_err(|e| e.to_string())
        }

        "page.ensure_button" => {
            let mut page = page_param(params)?;
            let outcome = ensure_present(&mut page);
            Ok(json!({"outcome": outcome_name(outcome), "page": page}))
        }
        "page.navigate" => {
            let mut page = page_param(params)?;
            let signal = parse_signal(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            match a.watcher.observe(signal, &page.location) {
                NavigationOutcome::Unchanged => Ok(json!({"reinject": false, "page": page})),
                NavigationOutcome::Reinject { settle } => {
                    let outcome = reinject(&mut page);
                    Ok(json!({
                        "reinject": true,
                        "settle_ms": settle.as_millis() as u64,
                        "outcome": outcome_name(outcome),
                        "page": page,
                    }))
                }
            }
        }

        // ─── Panel ───
        "panel.load" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let bookmarks = a.panel.load().map_err(|e| e.to_string())?;
            Ok(json!({"bookmarks": bookmarks, "view": a.panel.view()}))
        }
        "panel.view" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.panel.view()).map_err(|e| e.to_string())
        }
        "panel.poll" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let rerendered = a.panel.pump().map_err(|e| e.to_string())?;
            Ok(json!({"rerendered": rerendered, "view": a.panel.view()}))
        }
        "panel.edit_note" => {
            let id = str_param(params, "id")?;
            let note = str_param(params, "note")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.panel.edit(id, note.trim()).map_err(|e| e.to_string())?;
            a.sync_panel();
            Ok(json!({"ok": true}))
        }
        "panel.expand_note" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let expanded = a.panel.expand_editor(id);
            Ok(json!({"expanded": expanded}))
        }
        "panel.blur_note" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            if let Some(text) = params.get("text").and_then(|v| v.as_str()) {
                a.panel.type_note(id, text);
            }
            let saved = a.panel.blur_editor(id);
            a.sync_panel();
            Ok(json!({"saved": saved}))
        }
        "panel.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let remaining = a.panel.delete(id).map_err(|e| e.to_string())?;
            a.sync_panel();
            Ok(json!({"remaining": remaining.len(), "view": a.panel.view()}))
        }
        "panel.open" => {
            let id = str_param(params, "id")?;
            let origin = parse_origin(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"url": a.panel.open(id, origin)}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
