//! Request and response hooks
//!
//! The transport runs request interceptors in registration order before a call
//! leaves the process and response interceptors in registration order after it
//! settles. Each hook receives an owned value and returns the value the next
//! hook sees, so hooks can be tested in isolation.
//!
//! Header injection (for example an `Authorization` header) belongs in a
//! [`RequestInterceptor`]:
//!
//! ```ignore
//! use core_api::{ApiError, RequestDescriptor, RequestInterceptor};
//!
//! struct BearerToken(String);
//!
//! impl RequestInterceptor for BearerToken {
//!     fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor, ApiError> {
//!         Ok(request.with_header("Authorization", format!("Bearer {}", self.0)))
//!     }
//! }
//! ```

use bridge_traits::http::HttpResponse;
use bridge_traits::platform::PlatformSendSync;
use bridge_traits::ui::{NotificationLevel, Notifier};
use core_runtime::events::{CoreEvent, EventBus, NotificationEvent, RequestEvent};
use std::sync::Arc;
use tracing::warn;

use crate::classify::{classify, notify};
use crate::descriptor::RequestDescriptor;
use crate::error::{ApiError, TransportFailure};

/// Result of a dispatched call as seen by response interceptors
pub type Outcome = std::result::Result<HttpResponse, TransportFailure>;

/// Hook run before dispatch
pub trait RequestInterceptor: PlatformSendSync {
    /// Return the descriptor to send, or an error to short-circuit the call.
    fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor, ApiError>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(RequestDescriptor) -> Result<RequestDescriptor, ApiError> + PlatformSendSync,
{
    fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor, ApiError> {
        self(request)
    }
}

/// Hook run after the call settles
pub trait ResponseInterceptor: PlatformSendSync {
    fn on_response(&self, request: &RequestDescriptor, outcome: Outcome) -> Outcome;
}

impl<F> ResponseInterceptor for F
where
    F: Fn(&RequestDescriptor, Outcome) -> Outcome + PlatformSendSync,
{
    fn on_response(&self, request: &RequestDescriptor, outcome: Outcome) -> Outcome {
        self(request, outcome)
    }
}

/// Terminal response hook: classifies failures and raises an error toast.
///
/// The outcome passes through unchanged.
pub struct NotifyOnFailure {
    notifier: Arc<dyn Notifier>,
    events: Option<EventBus>,
}

impl NotifyOnFailure {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            events: None,
        }
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: CoreEvent) {
        if let Some(events) = &self.events {
            events.emit(event).ok();
        }
    }
}

impl ResponseInterceptor for NotifyOnFailure {
    fn on_response(&self, request: &RequestDescriptor, outcome: Outcome) -> Outcome {
        let Err(failure) = &outcome else {
            return outcome;
        };

        let classified = classify(failure);

        warn!(
            method = %request.method(),
            path = request.path(),
            status = failure.status,
            kind = %failure.kind,
            category = %classified.category,
            "Request failed: {}",
            failure.message
        );

        notify(self.notifier.as_ref(), &classified);

        self.emit(CoreEvent::Request(RequestEvent::Failed {
            method: request.method().to_string(),
            path: request.path().to_string(),
            status: failure.status,
            category: classified.category.to_string(),
            message: classified.message.clone(),
        }));
        self.emit(CoreEvent::Notification(NotificationEvent::Shown {
            level: NotificationLevel::Error,
            message: classified.message,
        }));

        outcome
    }
}
