//! Navigation guards and hooks
//!
//! A navigation runs its stages in this order:
//!
//! 1. [`BeforeGuard`]s, in registration order; any of them may redirect or cancel
//! 2. the [`ViewLoader`], which resolves the target's component
//! 3. [`AfterGuard`]s, once the view is committed
//!
//! [`ErrorHook`]s run when any stage fails.

use async_trait::async_trait;
use bridge_traits::platform::PlatformSendSync;
use bridge_traits::ui::{DocumentTitle, Notification, Notifier};
use core_runtime::config::{CoreConfig, DEFAULT_APP_NAME, DEFAULT_DOCUMENT_TITLE};
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::{Result, RouterError};
use crate::route::{RouteMatch, RouteMeta};

/// Toast raised when a navigation fails.
pub const NAVIGATION_FAILURE_MESSAGE: &str = "page failed to load";

/// Decision of a pre-navigation guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    /// Abandon this navigation and start one to the given path
    Redirect(String),
    /// Abandon this navigation and stay on the current view
    Cancel,
}

/// Runs before the target view is resolved.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BeforeGuard: PlatformSendSync {
    async fn before_each(&self, to: &RouteMatch, from: Option<&RouteMatch>)
        -> Result<GuardOutcome>;
}

/// Runs after the target view is committed.
pub trait AfterGuard: PlatformSendSync {
    fn after_each(&self, to: &RouteMatch, from: Option<&RouteMatch>);
}

/// Runs when a navigation fails.
pub trait ErrorHook: PlatformSendSync {
    /// `to` is the path of the failed navigation.
    fn on_error(&self, error: &RouterError, to: &str);
}

/// Resolves the component of a matched route.
///
/// Hosts with lazily loaded pages fetch them here; a failure fails the
/// navigation.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ViewLoader: PlatformSendSync {
    async fn load(&self, route: &RouteMatch) -> Result<()>;
}

/// Loader for hosts whose pages are all bundled up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerViewLoader;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ViewLoader for EagerViewLoader {
    async fn load(&self, _route: &RouteMatch) -> Result<()> {
        Ok(())
    }
}

/// Sets the document title from the target route's metadata.
///
/// Always proceeds.
pub struct TitleGuard {
    document: Arc<dyn DocumentTitle>,
    app_name: String,
    default_title: String,
}

impl TitleGuard {
    pub fn new(document: Arc<dyn DocumentTitle>) -> Self {
        Self {
            document,
            app_name: DEFAULT_APP_NAME.to_string(),
            default_title: DEFAULT_DOCUMENT_TITLE.to_string(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            document: Arc::clone(&config.document_title),
            app_name: config.app_name.clone(),
            default_title: config.default_title.clone(),
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// `"{title} - {app_name}"`, or the default title when the route has none.
    pub fn title_for(&self, meta: &RouteMeta) -> String {
        match meta.title.as_deref().filter(|title| !title.is_empty()) {
            Some(title) => format!("{} - {}", title, self.app_name),
            None => self.default_title.clone(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BeforeGuard for TitleGuard {
    async fn before_each(
        &self,
        to: &RouteMatch,
        _from: Option<&RouteMatch>,
    ) -> Result<GuardOutcome> {
        let title = self.title_for(to.meta());
        debug!(route = to.name(), %title, "Setting document title");
        self.document.set_title(&title);
        Ok(GuardOutcome::Proceed)
    }
}

/// Logs a failed navigation and raises an error toast.
pub struct NotifyErrorHook {
    notifier: Arc<dyn Notifier>,
}

impl NotifyErrorHook {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

impl ErrorHook for NotifyErrorHook {
    fn on_error(&self, error: &RouterError, to: &str) {
        error!(to, "Navigation failed: {}", error);
        self.notifier
            .notify(Notification::error(NAVIGATION_FAILURE_MESSAGE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{RouteRecord, RouteTable};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTitle {
        titles: Mutex<Vec<String>>,
    }

    impl DocumentTitle for RecordingTitle {
        fn set_title(&self, title: &str) {
            self.titles.lock().unwrap().push(title.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    fn route(record: RouteRecord) -> RouteMatch {
        let path = record.path.clone();
        RouteTable::new(vec![record]).unwrap().resolve(&path).unwrap()
    }

    #[test]
    fn test_title_for() {
        let guard = TitleGuard::new(Arc::new(RecordingTitle::default()));
        assert_eq!(guard.title_for(&RouteMeta::titled("Scan")), "Scan - STRM Linker");
        assert_eq!(
            guard.title_for(&RouteMeta::default()),
            "STRM Linker - 字幕软链管理工具"
        );
        assert_eq!(
            guard.title_for(&RouteMeta::titled("")),
            "STRM Linker - 字幕软链管理工具"
        );

        let guard = guard.with_app_name("Linker").with_default_title("Linker");
        assert_eq!(guard.title_for(&RouteMeta::titled("日志查看")), "日志查看 - Linker");
        assert_eq!(guard.title_for(&RouteMeta::default()), "Linker");
    }

    #[tokio::test]
    async fn test_title_guard_sets_title_and_proceeds() {
        let document = Arc::new(RecordingTitle::default());
        let guard = TitleGuard::new(document.clone());

        let scan = route(
            RouteRecord::new("/scan", "Scan", "Scan").with_meta(RouteMeta::titled("Scan")),
        );
        let bare = route(RouteRecord::new("/bare", "Bare", "Bare"));

        assert_eq!(guard.before_each(&scan, None).await.unwrap(), GuardOutcome::Proceed);
        assert_eq!(
            guard.before_each(&bare, Some(&scan)).await.unwrap(),
            GuardOutcome::Proceed
        );

        assert_eq!(
            document.titles.lock().unwrap().as_slice(),
            &["Scan - STRM Linker", "STRM Linker - 字幕软链管理工具"]
        );
    }

    #[test]
    fn test_notify_error_hook() {
        let notifier = Arc::new(RecordingNotifier::default());
        let hook = NotifyErrorHook::new(notifier.clone());

        hook.on_error(
            &RouterError::ViewLoad {
                component: "NotFound".to_string(),
                message: "chunk missing".to_string(),
            },
            "/missing",
        );

        assert_eq!(
            notifier.sent.lock().unwrap().as_slice(),
            &[Notification::error("page failed to load")]
        );
    }

    #[tokio::test]
    async fn test_eager_view_loader() {
        let home = route(RouteRecord::new("/", "Home", "Home"));
        assert!(EagerViewLoader.load(&home).await.is_ok());
    }
}
