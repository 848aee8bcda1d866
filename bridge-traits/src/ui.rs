//! Host UI Abstractions
//!
//! The client core never renders anything itself. It drives three small host
//! surfaces instead:
//! - [`LoadingIndicator`] - a blocking "request in progress" overlay
//! - [`Notifier`] - transient toast-style messages
//! - [`DocumentTitle`] - the window/tab title
//!
//! All methods are synchronous: they are expected to schedule UI work and
//! return immediately.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::platform::PlatformSendSync;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// A single toast message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }
}

/// Full-screen loading overlay controlled by the host
///
/// The core guarantees that `show` and `hide` alternate: `show` is never
/// called twice without a `hide` in between.
pub trait LoadingIndicator: PlatformSendSync {
    /// Display the overlay with the given caption
    fn show(&self, text: &str);

    /// Remove the overlay
    fn hide(&self);
}

/// Toast notification sink
///
/// # Example
///
/// ```ignore
/// use bridge_traits::ui::{Notification, Notifier};
///
/// fn report(notifier: &dyn Notifier) {
///     notifier.notify(Notification::error("internal server error"));
/// }
/// ```
pub trait Notifier: PlatformSendSync {
    fn notify(&self, notification: Notification);
}

/// Writable document title (browser tab, window caption, terminal title)
pub trait DocumentTitle: PlatformSendSync {
    fn set_title(&self, title: &str);
}
