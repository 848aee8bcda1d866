//! Convenience helpers for wiring all wasm bridge implementations together.
//!
//! Host shells can use [`build_wasm_bridges`] to construct the fetch client
//! and the DOM-backed UI bridges in one call. The result mirrors the role that
//! the `bridge-desktop` crate plays for native targets, giving wasm builds a
//! single entry point for assembling bridge trait objects.

use std::sync::Arc;

use bridge_traits::{
    error::Result as BridgeResult,
    http::HttpClient,
    ui::{DocumentTitle, LoadingIndicator, Notifier},
};

use crate::http::WasmHttpClient;
use crate::ui::{ConsoleNotifier, DomDocumentTitle, DomLoadingOverlay, JsNotifier};

/// Configuration for [`build_wasm_bridges`].
#[derive(Debug, Clone)]
pub struct WasmBridgeConfig {
    /// Host toast function called as `callback(level, message)`.
    ///
    /// Toasts go to the developer console when unset.
    pub toast_callback: Option<js_sys::Function>,
    /// Install `console_error_panic_hook` so panics reach the console.
    pub panic_hook: bool,
}

impl WasmBridgeConfig {
    /// Console toasts with the panic hook installed.
    pub fn new() -> Self {
        Self {
            toast_callback: None,
            panic_hook: true,
        }
    }

    /// Route toasts to a host JavaScript function.
    pub fn with_toast_callback(mut self, callback: js_sys::Function) -> Self {
        self.toast_callback = Some(callback);
        self
    }

    /// Toggle the panic hook.
    pub fn with_panic_hook(mut self, enabled: bool) -> Self {
        self.panic_hook = enabled;
        self
    }
}

impl Default for WasmBridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fully constructed wasm bridge objects ready for injection into the core.
pub struct WasmBridgeSet {
    /// HTTP client powered by browser `fetch`.
    pub http_client: Arc<dyn HttpClient>,
    /// Overlay rendered into `document.body`.
    pub loading_indicator: Arc<dyn LoadingIndicator>,
    /// Toast sink.
    pub notifier: Arc<dyn Notifier>,
    /// `document.title` writer.
    pub document_title: Arc<dyn DocumentTitle>,
}

/// Build the default wasm bridge stack.
///
/// Hosts should call this during startup (e.g., inside their wasm bindgen
/// bootstrap) and pass the returned trait objects into `core-service`.
pub fn build_wasm_bridges(config: WasmBridgeConfig) -> BridgeResult<WasmBridgeSet> {
    if config.panic_hook {
        console_error_panic_hook::set_once();
    }

    let notifier: Arc<dyn Notifier> = match config.toast_callback {
        Some(callback) => Arc::new(JsNotifier::new(callback)),
        None => Arc::new(ConsoleNotifier),
    };

    Ok(WasmBridgeSet {
        http_client: Arc::new(WasmHttpClient::new()?),
        loading_indicator: Arc::new(DomLoadingOverlay::new()?),
        notifier,
        document_title: Arc::new(DomDocumentTitle::new()?),
    })
}
