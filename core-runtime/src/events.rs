//! # Event Bus System
//!
//! Provides an event-driven view of the client core using `tokio::sync::broadcast`.
//! The transport core, the loading coordinator and the navigation pipeline
//! publish what they do; hosts, devtools panels and tests subscribe.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for each component
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    emit     ┌───────────┐
//! │ ApiClient    ├────────────>│           │
//! └──────────────┘             │           │
//!                              │ EventBus  │   subscribe   ┌────────────┐
//! ┌──────────────┐    emit     │ (broadcast├──────────────>│ Subscriber │
//! │ Loading      ├────────────>│  channel) │               └────────────┘
//! └──────────────┘             │           │
//!                              │           │
//! ┌──────────────┐    emit     │           │
//! │ Router       ├────────────>│           │
//! └──────────────┘             └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, LoadingEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(CoreEvent::Loading(LoadingEvent::Shown { handle: 1 })).ok();
//!
//! let event = receiver.try_recv().unwrap();
//! assert!(matches!(event, CoreEvent::Loading(LoadingEvent::Shown { handle: 1 })));
//! ```
//!
//! ## Event Types
//!
//! ### Request Events
//! - `Started`: A request left the interceptor chain
//! - `Succeeded`: A 2xx response was received
//! - `Failed`: The request failed and was classified
//! - `Rejected`: A request interceptor short-circuited the call
//!
//! ### Loading Events
//! - `Shown` / `Closed`: The loading overlay was opened or closed
//!
//! ### Notification Events
//! - `Shown`: A toast was handed to the host notifier
//!
//! ### Navigation Events
//! - `Started`, `Resolved`, `Redirected`, `Cancelled`, `Failed`
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.
//!
//! Emitting with no subscribers returns an error that publishers ignore.

use bridge_traits::ui::NotificationLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Transport core events
    Request(RequestEvent),
    /// Loading overlay events
    Loading(LoadingEvent),
    /// User-facing notification events
    Notification(NotificationEvent),
    /// Navigation pipeline events
    Navigation(NavigationEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Request(e) => e.description(),
            CoreEvent::Loading(e) => e.description(),
            CoreEvent::Notification(e) => e.description(),
            CoreEvent::Navigation(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Request(RequestEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Navigation(NavigationEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Notification(NotificationEvent::Shown { level, .. }) => match level {
                NotificationLevel::Error => EventSeverity::Error,
                NotificationLevel::Warning => EventSeverity::Warning,
                NotificationLevel::Info | NotificationLevel::Success => EventSeverity::Info,
            },
            CoreEvent::Request(RequestEvent::Rejected { .. }) => EventSeverity::Warning,
            CoreEvent::Navigation(NavigationEvent::Resolved { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Request Events
// ============================================================================

/// Events emitted by the transport core, one sequence per call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum RequestEvent {
    /// The request passed the interceptor chain and is about to be sent.
    Started {
        /// HTTP method
        method: String,
        /// Path relative to the API base
        path: String,
    },
    /// A 2xx response was received.
    Succeeded {
        method: String,
        path: String,
        /// HTTP status code
        status: u16,
        /// Wall time from dispatch to response
        elapsed_ms: u64,
    },
    /// The request failed after dispatch.
    Failed {
        method: String,
        path: String,
        /// HTTP status, absent for timeouts and network failures
        status: Option<u16>,
        /// Classification category (`not-found`, `server-error`, ...)
        category: String,
        /// User-facing message
        message: String,
    },
    /// A request interceptor refused the call before dispatch.
    Rejected {
        method: String,
        path: String,
        /// Reason given by the interceptor
        reason: String,
    },
}

impl RequestEvent {
    fn description(&self) -> &str {
        match self {
            RequestEvent::Started { .. } => "Request started",
            RequestEvent::Succeeded { .. } => "Request succeeded",
            RequestEvent::Failed { .. } => "Request failed",
            RequestEvent::Rejected { .. } => "Request rejected before dispatch",
        }
    }
}

// ============================================================================
// Loading Events
// ============================================================================

/// Loading overlay lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LoadingEvent {
    /// The overlay became visible.
    Shown {
        /// Opaque handle identifying this overlay instance
        handle: u64,
    },
    /// The overlay was removed.
    Closed { handle: u64 },
}

impl LoadingEvent {
    fn description(&self) -> &str {
        match self {
            LoadingEvent::Shown { .. } => "Loading overlay shown",
            LoadingEvent::Closed { .. } => "Loading overlay closed",
        }
    }
}

// ============================================================================
// Notification Events
// ============================================================================

/// Toasts handed to the host notifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum NotificationEvent {
    Shown {
        level: NotificationLevel,
        message: String,
    },
}

impl NotificationEvent {
    fn description(&self) -> &str {
        match self {
            NotificationEvent::Shown { .. } => "Notification shown",
        }
    }
}

// ============================================================================
// Navigation Events
// ============================================================================

/// Route transition lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum NavigationEvent {
    /// A navigation intent was accepted.
    Started {
        /// Path of the current view, if any
        from: Option<String>,
        /// Requested path
        to: String,
    },
    /// A guard redirected the navigation.
    Redirected { from: String, to: String },
    /// A guard cancelled the navigation.
    Cancelled { to: String },
    /// The target view was committed.
    Resolved {
        /// Committed path
        path: String,
        /// Name of the matched route
        name: String,
    },
    /// The navigation failed; the previous view stays active.
    Failed { to: String, reason: String },
}

impl NavigationEvent {
    fn description(&self) -> &str {
        match self {
            NavigationEvent::Started { .. } => "Navigation started",
            NavigationEvent::Redirected { .. } => "Navigation redirected",
            NavigationEvent::Cancelled { .. } => "Navigation cancelled",
            NavigationEvent::Resolved { .. } => "Navigation resolved",
            NavigationEvent::Failed { .. } => "Navigation failed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let navigation = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Navigation(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every event currently buffered that passes the filter.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
