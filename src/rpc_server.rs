//! FuzzyTabber RPC Server: the command bridge over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"openTab", "args":[12, {"bringTabToWindow":true}], "windowId":2}
//! Response: {"id":1, "result":...} or {"id":1, "error":"Fail"}
//!
//! The host is an in-memory browser seeded from the JSON tab list at
//! `$FUZZYTABBER_TABS` when set.

use std::fs;
use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::{info, warn};

use fuzzytabber::bridge::CommandBridge;
use fuzzytabber::managers::tab_manager::MemoryHost;
use fuzzytabber::services::logging;
use fuzzytabber::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use fuzzytabber::types::rpc::{error_marker, into_result, BridgeRequest, RequestContext, FAILURE_MARKER};
use fuzzytabber::types::tab::Tab;

fn load_seed_tabs() -> Vec<Tab> {
    let path = match std::env::var("FUZZYTABBER_TABS") {
        Ok(path) => path,
        Err(_) => return Vec::new(),
    };
    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Vec<Tab>>(&content).map_err(|e| e.to_string()));
    match parsed {
        Ok(tabs) => tabs,
        Err(e) => {
            warn!(path = %path, error = %e, "ignoring unreadable tab seed file");
            Vec::new()
        }
    }
}

fn write_line(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() -> io::Result<()> {
    let mut engine = SettingsEngine::new(std::env::var("FUZZYTABBER_CONFIG").ok());
    let settings = engine.load().unwrap_or_else(|e| {
        eprintln!("[fuzzytabber-rpc] {e}, using defaults");
        Default::default()
    });
    logging::init(&settings.logging.level);

    let host = MemoryHost::from_tabs(load_seed_tabs());
    let mut bridge = CommandBridge::new(host.clone(), settings.bridge.refresh_policy);
    bridge.start();
    info!(tabs = bridge.cache().tabs().len(), "bridge ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_line(
        &mut out,
        &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}),
    )?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                write_line(&mut out, &json!({"id": null, "error": format!("parse error: {}", e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let ctx = RequestContext {
            window_id: req.get("windowId").and_then(|v| v.as_i64()),
        };

        let response = match serde_json::from_value::<BridgeRequest>(req) {
            Ok(request) => bridge.handle_request(&request, ctx),
            Err(_) => error_marker(),
        };

        // Lifecycle events caused by this call become visible to the next one.
        for event in host.take_events() {
            bridge.on_host_event(event);
        }

        let response = match into_result(response) {
            Ok(result) => json!({"id": id, "result": result}),
            Err(_) => json!({"id": id, "error": FAILURE_MARKER}),
        };
        write_line(&mut out, &response)?;
    }
    Ok(())
}
