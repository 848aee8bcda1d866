//! Browser implementations of the UI bridges
//!
//! - [`DomLoadingOverlay`] renders a full-screen overlay into `document.body`
//! - [`ConsoleNotifier`] writes toasts to the developer console
//! - [`JsNotifier`] hands toasts to a host JavaScript function
//! - [`DomDocumentTitle`] writes `document.title`

use bridge_traits::ui::{DocumentTitle, LoadingIndicator, Notification, NotificationLevel, Notifier};
use std::cell::RefCell;
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::error::{js_message, WasmError, WasmResult};

const OVERLAY_BACKGROUND: &str = "rgba(0, 0, 0, 0.7)";

fn document() -> WasmResult<Document> {
    web_sys::window()
        .ok_or_else(|| WasmError::NotAvailable("window".to_string()))?
        .document()
        .ok_or_else(|| WasmError::NotAvailable("document".to_string()))
}

/// Full-screen, click-blocking loading overlay
pub struct DomLoadingOverlay {
    document: Document,
    element: RefCell<Option<Element>>,
}

impl DomLoadingOverlay {
    /// Bind to the current document.
    pub fn new() -> WasmResult<Self> {
        Ok(Self {
            document: document()?,
            element: RefCell::new(None),
        })
    }

    fn render(&self, text: &str) -> WasmResult<Element> {
        let overlay = self.document.create_element("div")?;
        overlay.set_attribute("role", "progressbar")?;
        overlay.set_attribute("aria-busy", "true")?;
        overlay.set_attribute(
            "style",
            &format!(
                "position:fixed;inset:0;z-index:9999;display:flex;align-items:center;\
                 justify-content:center;background:{};color:#fff;font-size:14px;",
                OVERLAY_BACKGROUND
            ),
        )?;
        overlay.set_text_content(Some(text));

        let body = self
            .document
            .body()
            .ok_or_else(|| WasmError::NotAvailable("document.body".to_string()))?;
        body.append_child(&overlay)?;
        Ok(overlay)
    }
}

impl LoadingIndicator for DomLoadingOverlay {
    fn show(&self, text: &str) {
        let mut element = self.element.borrow_mut();
        if element.is_some() {
            return;
        }
        match self.render(text) {
            Ok(overlay) => *element = Some(overlay),
            Err(err) => warn!("Failed to render loading overlay: {}", err),
        }
    }

    fn hide(&self) {
        if let Some(overlay) = self.element.borrow_mut().take() {
            overlay.remove();
        }
    }
}

/// Notifier that writes to the browser console
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let message = JsValue::from_str(&notification.message);
        match notification.level {
            NotificationLevel::Error => web_sys::console::error_1(&message),
            NotificationLevel::Warning => web_sys::console::warn_1(&message),
            NotificationLevel::Info | NotificationLevel::Success => {
                web_sys::console::info_1(&message)
            }
        }
    }
}

/// Notifier that calls a host function as `callback(level, message)`
///
/// Hosts pass their toast component's entry point, for example a wrapper
/// around `ElMessage({ type: level, message })`.
pub struct JsNotifier {
    callback: js_sys::Function,
}

impl JsNotifier {
    /// Wrap a host function.
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

impl Notifier for JsNotifier {
    fn notify(&self, notification: Notification) {
        let level = JsValue::from_str(&notification.level.to_string());
        let message = JsValue::from_str(&notification.message);
        if let Err(err) = self.callback.call2(&JsValue::NULL, &level, &message) {
            warn!("Toast callback threw: {}", js_message(&err));
            ConsoleNotifier.notify(notification);
        }
    }
}

/// Writes `document.title`
pub struct DomDocumentTitle {
    document: Document,
}

impl DomDocumentTitle {
    /// Bind to the current document.
    pub fn new() -> WasmResult<Self> {
        Ok(Self {
            document: document()?,
        })
    }
}

impl DocumentTitle for DomDocumentTitle {
    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }
}
