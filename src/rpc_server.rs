//! timemark RPC Server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"page.capture", "params":{"page":{...},"note":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use timemark::app::App;
use timemark::platform;
use timemark::rpc_handler::handle_method;

use serde_json::{json, Value};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn send(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let data_dir = std::env::var("TIMEMARK_DATA_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| platform::get_data_dir());

    let app = match App::in_data_dir(&data_dir, None) {
        Ok(app) => app,
        Err(e) => {
            log::error!("[RPC] Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };
    let app = Mutex::new(app);
    if let Ok(mut a) = app.lock() {
        a.startup();
    }
    log::info!("[RPC] Serving on stdin/stdout, data in {}", data_dir.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if send(&mut out, &json!({"event":"ready","version":env!("CARGO_PKG_VERSION")})).is_err() {
        return;
    }

    let mut rate_limiter = RateLimiter::new(200);

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
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                if !rate_limiter.check() {
                    json!({"id": id, "error": "rate limit exceeded"})
                } else {
                    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                    let params = req.get("params").cloned().unwrap_or(json!({}));
                    log::debug!("[RPC] {}", method);
                    match handle_method(&app, method, &params) {
                        Ok(val) => json!({"id": id, "result": val}),
                        Err(err) => {
                            log::warn!("[RPC] {} failed: {}", method, err);
                            json!({"id": id, "error": err})
                        }
                    }
                }
            }
        };

        if send(&mut out, &response).is_err() {
            break;
        }
    }
}
