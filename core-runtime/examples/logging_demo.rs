//! Logging system demonstration
//!
//! Emits the kind of records the transport core and the router produce, in
//! the selected output format.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format with a custom filter
//! cargo run --example logging_demo -- compact "logging_demo=trace"
//! ```

use bridge_traits::logging::LogLevel;
use core_runtime::logging::{
    init_logging, redact_if_sensitive, strip_path, LogFormat, LoggingConfig,
};
use std::env;
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let filter = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "logging_demo=trace".to_string());

    let config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_filter(filter)
        .with_span_events(true);

    init_logging(config).expect("Failed to initialize logging");

    info!(format = ?format, "Logging initialized");

    demo_request_lifecycle().await;
    demo_failure();
    demo_redaction();
    demo_navigation();
}

#[instrument(fields(method = "POST", path = "/config/scan"))]
async fn demo_request_lifecycle() {
    debug!(handle = 1, "Loading overlay shown");
    debug!(url = "http://localhost:8000/api/config/scan", "Dispatching request");
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    debug!(status = 200, elapsed_ms = 10, "Request succeeded");
    debug!(handle = 1, "Loading overlay closed");
}

fn demo_failure() {
    let span = span!(Level::INFO, "request", method = "GET", path = "/config/watch/status");
    let _enter = span.enter();

    warn!(
        status = 500,
        kind = "status",
        category = "server-error",
        "Request failed: Request failed with status code 500"
    );
    warn!(status = 418, "Unlisted status classified as network error");
}

fn demo_redaction() {
    let token = "Bearer secret_access_token_12345";
    let directory = "/home/user/media/tv/Some Show";

    trace!(
        header = "Authorization",
        value = %redact_if_sensitive("authorization", token),
        "Request header"
    );
    info!(directory = %strip_path(directory), "Scanning directory");
}

fn demo_navigation() {
    let span = span!(Level::INFO, "navigate", path = "/logs");
    let _enter = span.enter();

    debug!(route = "Logs", title = "日志查看 - STRM Linker", "Setting document title");
    error!(to = "/logs", "Navigation failed: Failed to load view 'Logs': chunk missing");
}
