//! Loading-Overlay Coordinator
//!
//! Tracks at most one visible loading overlay across all in-flight calls.
//! `show` never stacks a second overlay and `close` only acts on the active
//! handle, so every overlay the host sees is shown once and hidden once.
//!
//! The coordinator is injected into [`ApiClient`](crate::ApiClient) at
//! construction; nothing in this crate keeps a global instance.

use bridge_traits::ui::LoadingIndicator;
use core_runtime::events::{CoreEvent, EventBus, LoadingEvent};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

/// Opaque token for one overlay instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadingHandle(u64);

impl LoadingHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct LoadingState {
    active: Option<LoadingHandle>,
    next_id: u64,
}

pub struct LoadingCoordinator {
    indicator: Arc<dyn LoadingIndicator>,
    text: String,
    state: Mutex<LoadingState>,
    events: Option<EventBus>,
}

impl LoadingCoordinator {
    pub fn new(indicator: Arc<dyn LoadingIndicator>, text: impl Into<String>) -> Self {
        Self {
            indicator,
            text: text.into(),
            state: Mutex::new(LoadingState::default()),
            events: None,
        }
    }

    /// Publish `LoadingEvent`s on the given bus.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Open the overlay, or return the handle of the one already visible.
    pub fn show(&self) -> LoadingHandle {
        let mut state = self.lock();

        if let Some(handle) = state.active {
            trace!(handle = handle.id(), "Loading overlay already visible");
            return handle;
        }

        state.next_id += 1;
        let handle = LoadingHandle(state.next_id);
        state.active = Some(handle);

        // Host calls stay under the lock so show/hide reach it in order.
        self.indicator.show(&self.text);
        self.emit(LoadingEvent::Shown { handle: handle.id() });
        handle
    }

    /// Close the overlay if `handle` is the active one; otherwise do nothing.
    pub fn close(&self, handle: LoadingHandle) {
        let mut state = self.lock();

        if state.active != Some(handle) {
            trace!(handle = handle.id(), "Ignoring close for inactive handle");
            return;
        }

        state.active = None;
        self.indicator.hide();
        self.emit(LoadingEvent::Closed { handle: handle.id() });
    }

    pub fn active(&self) -> Option<LoadingHandle> {
        self.lock().active
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn lock(&self) -> MutexGuard<'_, LoadingState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, event: LoadingEvent) {
        if let Some(events) = &self.events {
            events.emit(CoreEvent::Loading(event)).ok();
        }
    }
}

impl std::fmt::Debug for LoadingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingCoordinator")
            .field("text", &self.text)
            .field("active", &self.active())
            .finish()
    }
}

/// Closes its handle when dropped.
///
/// Held by the transport for the duration of a call so the overlay is
/// released on every exit path, including early returns.
pub(crate) struct LoadingGuard<'a> {
    coordinator: &'a LoadingCoordinator,
    handle: LoadingHandle,
}

impl<'a> LoadingGuard<'a> {
    pub(crate) fn open(coordinator: &'a LoadingCoordinator) -> Self {
        let handle = coordinator.show();
        Self {
            coordinator,
            handle,
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.close(self.handle);
    }
}
