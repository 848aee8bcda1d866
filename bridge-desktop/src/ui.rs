//! Headless UI shims for desktop hosts
//!
//! Desktop shells that have not wired their own widgets still get working
//! defaults: overlays and toasts become structured log lines and the title
//! is kept in memory for the shell to read back.

use bridge_traits::ui::{DocumentTitle, LoadingIndicator, Notification, NotificationLevel, Notifier};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

/// Loading indicator that records visibility and logs transitions
#[derive(Debug, Default)]
pub struct LogLoadingIndicator {
    visible: AtomicBool,
}

impl LogLoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the overlay is currently shown
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl LoadingIndicator for LogLoadingIndicator {
    fn show(&self, text: &str) {
        self.visible.store(true, Ordering::SeqCst);
        debug!(text, "Loading overlay shown");
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
        debug!("Loading overlay hidden");
    }
}

/// Notifier that forwards toasts to `tracing` at a matching level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let message = &notification.message;
        match notification.level {
            NotificationLevel::Error => error!(target: "strm_linker::toast", "{}", message),
            NotificationLevel::Warning => warn!(target: "strm_linker::toast", "{}", message),
            NotificationLevel::Info | NotificationLevel::Success => {
                info!(target: "strm_linker::toast", level = %notification.level, "{}", message)
            }
        }
    }
}

/// In-memory window title
#[derive(Debug, Default)]
pub struct SharedDocumentTitle {
    title: RwLock<String>,
}

impl SharedDocumentTitle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last title written by the router
    pub fn current(&self) -> String {
        match self.title.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DocumentTitle for SharedDocumentTitle {
    fn set_title(&self, title: &str) {
        match self.title.write() {
            Ok(mut guard) => *guard = title.to_string(),
            Err(poisoned) => *poisoned.into_inner() = title.to_string(),
        }
        debug!(title, "Document title updated");
    }
}
