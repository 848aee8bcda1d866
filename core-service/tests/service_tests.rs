//! End-to-end tests for the assembled core

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use bridge_traits::ui::{DocumentTitle, LoadingIndicator, Notification, Notifier};
use bytes::Bytes;
use core_api::{ApiError, RequestDescriptor, ScanConfig};
use core_router::{NavigationState, RouteMatch, RouterError, ViewLoader};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, LoadingEvent, NavigationEvent, RequestEvent};
use core_runtime::logging::LoggingConfig;
use core_service::{CoreError, CoreService};
use mockall::mock;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

mock! {
    Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

#[derive(Default)]
struct Shell {
    log: Mutex<Vec<String>>,
}

impl Shell {
    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl LoadingIndicator for Shell {
    fn show(&self, text: &str) {
        self.push(format!("show:{}", text));
    }

    fn hide(&self) {
        self.push("hide".to_string());
    }
}

impl Notifier for Shell {
    fn notify(&self, notification: Notification) {
        self.push(format!("toast:{}", notification.message));
    }
}

impl DocumentTitle for Shell {
    fn set_title(&self, title: &str) {
        self.push(format!("title:{}", title));
    }
}

fn config(http: MockHttp, shell: &Arc<Shell>) -> CoreConfig {
    CoreConfig::builder()
        .api_base_url("/api")
        .http_client(Arc::new(http))
        .loading_indicator(shell.clone())
        .notifier(shell.clone())
        .document_title(shell.clone())
        .build()
        .unwrap()
}

fn ok(body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: Bytes::from(serde_json::to_vec(&body).unwrap()),
    }
}

#[tokio::test]
async fn test_scan_and_navigate() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .withf(|request| request.url == "/api/config/scan")
        .times(1)
        .returning(|_| {
            Ok(ok(json!({
                "directory": "/test/path",
                "processed": 5,
                "created_links": 3,
                "errors": [],
                "duration": 1.5
            })))
        });

    let shell = Arc::new(Shell::default());
    let core = CoreService::new(config(http, &shell)).unwrap();
    let mut events = core.subscribe();

    let result = core
        .config_api()
        .scan(&ScanConfig::new("/test/path"))
        .await
        .unwrap();
    assert_eq!(result.created_links, 3);

    core.router().navigate("/scan").await.unwrap();
    assert_eq!(core.router().state(), NavigationState::Resolved);

    assert_eq!(
        shell.log(),
        vec!["show:请求中...", "hide", "title:扫描管理 - STRM Linker"]
    );

    let events = events.drain();
    assert!(events.contains(&CoreEvent::Loading(LoadingEvent::Shown { handle: 1 })));
    assert!(events.iter().any(|event| matches!(
        event,
        CoreEvent::Request(RequestEvent::Succeeded { status: 200, path, .. }) if path == "/config/scan"
    )));
    assert!(events.contains(&CoreEvent::Navigation(NavigationEvent::Resolved {
        path: "/scan".to_string(),
        name: "Scan".to_string(),
    })));
}

#[tokio::test]
async fn test_custom_interceptors_and_hooks() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .withf(|request| {
            request.headers.get("Authorization").map(String::as_str) == Some("Bearer t")
        })
        .times(1)
        .returning(|_| {
            Ok(ok(json!({
                "status": "healthy",
                "version": "1.0.0",
                "services": { "scheduler": true, "watcher": false }
            })))
        });

    struct BrokenLogsPage;

    #[async_trait]
    impl ViewLoader for BrokenLogsPage {
        async fn load(&self, route: &RouteMatch) -> core_router::Result<()> {
            if route.name() == "Logs" {
                return Err(RouterError::ViewLoad {
                    component: "Logs".to_string(),
                    message: "chunk failed".to_string(),
                });
            }
            Ok(())
        }
    }

    let shell = Arc::new(Shell::default());
    let core = CoreService::builder(config(http, &shell))
        .request_interceptor(Arc::new(
            |request: RequestDescriptor| -> Result<RequestDescriptor, ApiError> {
                Ok(request.with_header("Authorization", "Bearer t"))
            },
        ))
        .view_loader(Arc::new(BrokenLogsPage))
        .build()
        .unwrap();

    let health = core.system_api().get_health().await.unwrap();
    assert!(health.is_healthy());

    let error = core.router().navigate("/logs").await.unwrap_err();
    assert!(matches!(error, RouterError::ViewLoad { .. }));
    assert_eq!(core.router().state(), NavigationState::Failed);
    assert_eq!(
        shell.log(),
        vec!["title:日志查看 - STRM Linker", "toast:page failed to load"]
    );
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let shell = Arc::new(Shell::default());
    let mut config = config(MockHttp::new(), &shell);
    config.event_buffer_size = 0;

    let error = CoreService::new(config).unwrap_err();
    assert!(matches!(error, CoreError::Config(_)));
}

#[derive(Default)]
struct HostLog {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for HostLog {
    async fn log(&self, entry: LogEntry) -> BridgeResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

// Installs the process-wide subscriber; no other test in this binary does.
#[tokio::test]
async fn test_logging_forwards_request_failures_to_host() {
    let mut http = MockHttp::new();
    http.expect_execute().times(1).returning(|_| {
        Ok(HttpResponse {
            status: 500,
            headers: HashMap::new(),
            body: Bytes::from_static(br#"{"detail":"boom"}"#),
        })
    });

    let host = Arc::new(HostLog::default());
    let shell = Arc::new(Shell::default());
    let core = CoreService::builder(config(http, &shell))
        .logging(
            LoggingConfig::default()
                .with_level(LogLevel::Debug)
                .with_logger_sink(host.clone()),
        )
        .build()
        .unwrap();

    let error = core
        .config_api()
        .cleanup("/media/tv/Some Show", true)
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(500));

    // Entries are handed to the sink on spawned tasks.
    let mut failure = None;
    for _ in 0..20 {
        tokio::task::yield_now().await;
        failure = host
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.message.starts_with("Request failed"))
            .cloned();
        if failure.is_some() {
            break;
        }
    }

    let failure = failure.unwrap();
    assert_eq!(failure.level, LogLevel::Warn);
    assert_eq!(failure.fields["path"], "/config/cleanup");
    assert_eq!(failure.fields["status"], "500");
    assert_eq!(failure.fields["category"], "server-error");

    let cleanup = host
        .entries
        .lock()
        .unwrap()
        .iter()
        .find(|entry| entry.message == "Cleanup requested")
        .cloned()
        .unwrap();
    assert_eq!(cleanup.fields["directory"], "Some Show");
}
