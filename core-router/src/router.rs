//! Navigation state machine
//!
//! ```text
//! Idle ──navigate──> Navigating ──commit──> Resolved
//!                        │
//!                        ├──cancel──> Resolved, or Idle with no current view
//!                        └──error───> Failed
//! ```
//!
//! A navigation started while another one is awaiting a guard or the view
//! loader supersedes it: the older navigation finishes as cancelled without
//! touching the router state, even when its guard or loader failed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, NavigationEvent};

use crate::error::{Result, RouterError};
use crate::guard::{
    AfterGuard, BeforeGuard, EagerViewLoader, ErrorHook, GuardOutcome, NotifyErrorHook,
    TitleGuard, ViewLoader,
};
use crate::route::{RouteMatch, RouteTable};

/// Redirects one navigation may follow before it fails.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationState {
    #[default]
    Idle,
    Navigating,
    Resolved,
    Failed,
}

impl NavigationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationState::Idle => "idle",
            NavigationState::Navigating => "navigating",
            NavigationState::Resolved => "resolved",
            NavigationState::Failed => "failed",
        }
    }

    pub fn is_navigating(&self) -> bool {
        matches!(self, NavigationState::Navigating)
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a navigation that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target view is now current
    Resolved(RouteMatch),
    /// A guard cancelled the navigation, or a newer one superseded it
    Cancelled,
}

impl NavigationOutcome {
    pub fn route(&self) -> Option<&RouteMatch> {
        match self {
            NavigationOutcome::Resolved(route) => Some(route),
            NavigationOutcome::Cancelled => None,
        }
    }
}

enum Step {
    Commit(RouteMatch),
    Cancelled,
    Superseded,
}

#[derive(Debug, Default)]
struct RouterState {
    state: NavigationState,
    current: Option<RouteMatch>,
    generation: u64,
}

impl RouterState {
    /// State to fall back to when the latest navigation is cancelled.
    fn settled_state(&self) -> NavigationState {
        if self.current.is_some() {
            NavigationState::Resolved
        } else {
            NavigationState::Idle
        }
    }
}

/// Guarded navigation over a [`RouteTable`]
pub struct Router {
    routes: RouteTable,
    before_guards: Vec<Arc<dyn BeforeGuard>>,
    after_guards: Vec<Arc<dyn AfterGuard>>,
    error_hooks: Vec<Arc<dyn ErrorHook>>,
    loader: Arc<dyn ViewLoader>,
    inner: Mutex<RouterState>,
    events: Option<EventBus>,
}

impl Router {
    pub fn builder(routes: RouteTable) -> RouterBuilder {
        RouterBuilder {
            routes,
            before_guards: Vec::new(),
            after_guards: Vec::new(),
            error_hooks: Vec::new(),
            loader: Arc::new(EagerViewLoader),
            events: None,
        }
    }

    /// Default route table with the title guard and the notifying error hook
    /// wired to the configured bridges.
    pub fn from_config(config: &CoreConfig) -> Result<RouterBuilder> {
        let routes = RouteTable::new(RouteTable::default_routes())?;

        Ok(Self::builder(routes)
            .before_guard(Arc::new(TitleGuard::from_config(config)))
            .error_hook(Arc::new(NotifyErrorHook::new(Arc::clone(&config.notifier)))))
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn state(&self) -> NavigationState {
        self.lock().state
    }

    pub fn current_route(&self) -> Option<RouteMatch> {
        self.lock().current.clone()
    }

    /// Navigate to `path`.
    ///
    /// Errors are returned after the error hooks ran; the previous view stays
    /// current.
    #[instrument(skip(self))]
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome> {
        let (generation, from) = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = NavigationState::Navigating;
            (inner.generation, inner.current.clone())
        };

        debug!(from = ?from.as_ref().map(|route| &route.path), "Navigation started");
        self.emit(NavigationEvent::Started {
            from: from.as_ref().map(|route| route.full_path.clone()),
            to: path.to_string(),
        });

        match self.run(path, from.as_ref(), generation).await {
            Ok(Step::Commit(route)) => {
                if !self.commit(generation, &route) {
                    return Ok(self.superseded(path));
                }

                for guard in &self.after_guards {
                    guard.after_each(&route, from.as_ref());
                }

                info!(route = route.name(), path = %route.path, "Navigation resolved");
                self.emit(NavigationEvent::Resolved {
                    path: route.path.clone(),
                    name: route.name().to_string(),
                });
                Ok(NavigationOutcome::Resolved(route))
            }
            Ok(Step::Cancelled) => {
                {
                    let mut inner = self.lock();
                    if inner.generation == generation {
                        let settled = inner.settled_state();
                        inner.state = settled;
                    }
                }
                debug!("Navigation cancelled by guard");
                self.emit(NavigationEvent::Cancelled {
                    to: path.to_string(),
                });
                Ok(NavigationOutcome::Cancelled)
            }
            Ok(Step::Superseded) => Ok(self.superseded(path)),
            Err(error) => {
                let current = {
                    let mut inner = self.lock();
                    let current = inner.generation == generation;
                    if current {
                        inner.state = NavigationState::Failed;
                    }
                    current
                };
                if !current {
                    debug!(%error, "Superseded navigation failed");
                    return Ok(self.superseded(path));
                }

                for hook in &self.error_hooks {
                    hook.on_error(&error, path);
                }

                self.emit(NavigationEvent::Failed {
                    to: path.to_string(),
                    reason: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Navigate to a named route, filling in its path parameters.
    pub async fn navigate_by_name(
        &self,
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<NavigationOutcome> {
        let path = self.routes.href(name, params)?;
        self.navigate(&path).await
    }

    async fn run(&self, path: &str, from: Option<&RouteMatch>, generation: u64) -> Result<Step> {
        let mut target = path.to_string();
        let mut redirects = 0;

        loop {
            let to = self
                .routes
                .resolve(&target)
                .ok_or_else(|| RouterError::NoMatch(target.clone()))?;

            match self.run_before_guards(&to, from).await? {
                GuardOutcome::Proceed => {}
                GuardOutcome::Cancel => return Ok(Step::Cancelled),
                GuardOutcome::Redirect(next) => {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(RouterError::RedirectLimit {
                            path: path.to_string(),
                            limit: MAX_REDIRECTS,
                        });
                    }

                    debug!(from = %target, to = %next, "Navigation redirected");
                    self.emit(NavigationEvent::Redirected {
                        from: target,
                        to: next.clone(),
                    });
                    target = next;
                    continue;
                }
            }

            if !self.is_current(generation) {
                return Ok(Step::Superseded);
            }

            self.loader.load(&to).await?;

            if !self.is_current(generation) {
                return Ok(Step::Superseded);
            }

            return Ok(Step::Commit(to));
        }
    }

    async fn run_before_guards(
        &self,
        to: &RouteMatch,
        from: Option<&RouteMatch>,
    ) -> Result<GuardOutcome> {
        for guard in &self.before_guards {
            match guard.before_each(to, from).await? {
                GuardOutcome::Proceed => continue,
                outcome => return Ok(outcome),
            }
        }
        Ok(GuardOutcome::Proceed)
    }

    fn commit(&self, generation: u64, route: &RouteMatch) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        inner.current = Some(route.clone());
        inner.state = NavigationState::Resolved;
        true
    }

    fn superseded(&self, path: &str) -> NavigationOutcome {
        warn!(to = path, "Navigation superseded by a newer navigation");
        self.emit(NavigationEvent::Cancelled {
            to: path.to_string(),
        });
        NavigationOutcome::Cancelled
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: NavigationEvent) {
        if let Some(events) = &self.events {
            events.emit(CoreEvent::Navigation(event)).ok();
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .field("before_guards", &self.before_guards.len())
            .field("after_guards", &self.after_guards.len())
            .field("error_hooks", &self.error_hooks.len())
            .field("state", &self.state())
            .finish()
    }
}

/// Builder for [`Router`]
pub struct RouterBuilder {
    routes: RouteTable,
    before_guards: Vec<Arc<dyn BeforeGuard>>,
    after_guards: Vec<Arc<dyn AfterGuard>>,
    error_hooks: Vec<Arc<dyn ErrorHook>>,
    loader: Arc<dyn ViewLoader>,
    events: Option<EventBus>,
}

impl RouterBuilder {
    /// Append a pre-navigation guard; guards run in the order added.
    pub fn before_guard(mut self, guard: Arc<dyn BeforeGuard>) -> Self {
        self.before_guards.push(guard);
        self
    }

    pub fn after_guard(mut self, guard: Arc<dyn AfterGuard>) -> Self {
        self.after_guards.push(guard);
        self
    }

    pub fn error_hook(mut self, hook: Arc<dyn ErrorHook>) -> Self {
        self.error_hooks.push(hook);
        self
    }

    pub fn view_loader(mut self, loader: Arc<dyn ViewLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Router {
        Router {
            routes: self.routes,
            before_guards: self.before_guards,
            after_guards: self.after_guards,
            error_hooks: self.error_hooks,
            loader: self.loader,
            inner: Mutex::new(RouterState::default()),
            events: self.events,
        }
    }
}
