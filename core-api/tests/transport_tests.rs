//! Integration tests for the transport core and the facades

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::ui::{LoadingIndicator, Notification, Notifier};
use bytes::Bytes;
use core_api::{
    ApiClient, ApiError, BrowseApi, BrowseQuery, ConfigApi, ExportFormat, ExportQuery,
    FailureKind, LogsApi, Outcome, Payload, RequestDescriptor, ScanConfig, SystemApi,
};
use core_runtime::events::{CoreEvent, EventBus, RequestEvent};
use mockall::mock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

mock! {
    Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

/// Records overlay and toast calls in the order the host sees them.
#[derive(Default)]
struct RecordingUi {
    calls: Mutex<Vec<String>>,
}

impl RecordingUi {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn overlay_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with("show") || call == "hide")
            .collect()
    }

    fn toasts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix("toast:").map(str::to_string))
            .collect()
    }
}

impl LoadingIndicator for RecordingUi {
    fn show(&self, text: &str) {
        self.calls.lock().unwrap().push(format!("show:{}", text));
    }

    fn hide(&self) {
        self.calls.lock().unwrap().push("hide".to_string());
    }
}

impl Notifier for RecordingUi {
    fn notify(&self, notification: Notification) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("toast:{}", notification.message));
    }
}

const BASE: &str = "http://localhost:8000/api";

fn response(status: u16, body: &[u8]) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::copy_from_slice(body),
    }
}

fn json_response(status: u16, body: &Value) -> HttpResponse {
    response(status, &serde_json::to_vec(body).unwrap())
}

fn client_with(http: MockHttp) -> (Arc<ApiClient>, Arc<RecordingUi>) {
    let ui = Arc::new(RecordingUi::default());
    let client = ApiClient::builder(Arc::new(http), BASE, ui.clone(), ui.clone()).build();
    (Arc::new(client), ui)
}

fn single_response(status: u16, body: Value) -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(move |_| Ok(json_response(status, &body)));
    http
}

#[tokio::test]
async fn test_scan_resolves_with_payload_unmodified() {
    let body = json!({
        "directory": "/test/path",
        "processed": 5,
        "created_links": 3,
        "skipped": 2,
        "errors": [{ "file": "broken.strm", "error": "permission denied" }],
        "details": [{ "file": "movie.strm", "status": "created" }],
        "duration": 1.5
    });

    let mut http = MockHttp::new();
    let response_body = body.clone();
    http.expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Post
                && request.url == "http://localhost:8000/api/config/scan"
                && request.headers.get("Content-Type").map(String::as_str)
                    == Some("application/json")
        })
        .times(1)
        .returning(move |_| Ok(json_response(200, &response_body)));

    let (client, ui) = client_with(http);
    let result = ConfigApi::new(client)
        .scan(&ScanConfig::new("/test/path"))
        .await
        .unwrap();

    assert_eq!(result.processed, 5);
    assert_eq!(result.created_links, 3);
    assert_eq!(serde_json::to_value(&result).unwrap(), body);
    assert_eq!(ui.overlay_calls(), vec!["show:请求中...", "hide"]);
    assert!(ui.toasts().is_empty());
}

#[tokio::test]
async fn test_scan_sends_config_as_json_body() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .withf(|request| {
            let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
            body == json!({
                "directory": "/media",
                "target_formats": ["mp4", "mkv"],
                "recursive": true,
                "dry_run": true
            })
        })
        .times(1)
        .returning(|_| {
            Ok(json_response(
                200,
                &json!({
                    "directory": "/media",
                    "processed": 0,
                    "created_links": 0,
                    "errors": [],
                    "duration": 0.1
                }),
            ))
        });

    let (client, _) = client_with(http);
    let result = ConfigApi::new(client)
        .scan(&ScanConfig::new("/media").dry_run(true))
        .await
        .unwrap();
    assert_eq!(result.skipped, None);
}

#[tokio::test]
async fn test_failure_still_pairs_show_and_close() {
    let (client, ui) = client_with(single_response(500, json!({ "detail": "boom" })));

    let error = SystemApi::new(Arc::clone(&client))
        .get_health()
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(500));
    assert!(ui.overlay_calls().is_empty());

    let (client, ui) = client_with(single_response(500, json!({ "detail": "boom" })));
    let error = ConfigApi::new(client).get_watch_status().await.unwrap_err();

    assert_eq!(error.status(), Some(500));
    assert_eq!(ui.overlay_calls(), vec!["show:请求中...", "hide"]);
    assert_eq!(ui.toasts(), vec!["internal server error"]);
}

#[tokio::test]
async fn test_toast_is_raised_before_overlay_closes() {
    let (client, ui) = client_with(single_response(404, json!({ "detail": "Not Found" })));

    ConfigApi::new(client).get_scheduler_status().await.unwrap_err();

    assert_eq!(
        ui.calls(),
        vec!["show:请求中...", "toast:interface not found", "hide"]
    );
}

#[tokio::test]
async fn test_not_found_reports_interface_not_found() {
    let (client, ui) = client_with(single_response(404, json!({ "detail": "Not Found" })));

    let error = ConfigApi::new(client)
        .run_task_now("nightly")
        .await
        .unwrap_err();

    assert_eq!(ui.toasts(), vec!["interface not found"]);
    let failure = error.transport_failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Status);
    assert_eq!(failure.message, "Request failed with status code 404");
}

#[tokio::test]
async fn test_server_error_reports_internal_server_error() {
    let (client, ui) = client_with(single_response(
        500,
        json!({ "detail": "watcher crashed: inotify limit reached" }),
    ));

    let error = ConfigApi::new(client).start_watcher().await.unwrap_err();

    assert_eq!(ui.toasts(), vec!["internal server error"]);
    assert_eq!(ui.overlay_calls(), vec!["show:请求中...", "hide"]);
    assert!(matches!(
        &error,
        ApiError::Transport(failure) if failure.status == Some(500)
            && failure.kind == FailureKind::Status
            && failure.message == "Request failed with status code 500"
    ));
}

#[tokio::test]
async fn test_client_error_uses_body_detail() {
    let (client, ui) = client_with(single_response(422, json!({ "detail": "bad field" })));

    let error = ConfigApi::new(client)
        .add_watch_directory(&core_api::WatchConfig::new("/media"))
        .await
        .unwrap_err();

    assert_eq!(ui.toasts(), vec!["bad field"]);
    let failure = error.transport_failure().unwrap();
    assert_eq!(failure.status, Some(422));
    assert_eq!(
        failure.body.as_deref(),
        Some(br#"{"detail":"bad field"}"#.as_slice())
    );
}

#[tokio::test]
async fn test_client_error_with_html_body_uses_transport_message() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(response(400, b"<html>Bad Request</html>")));

    let (client, ui) = client_with(http);
    ConfigApi::new(client)
        .cleanup("/missing", true)
        .await
        .unwrap_err();

    assert_eq!(ui.toasts(), vec!["Request failed with status code 400"]);
}

#[tokio::test]
async fn test_network_failure_reports_network_error() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::ConnectionFailed("connection refused".to_string())));

    let (client, ui) = client_with(http);
    let error = ConfigApi::new(client).start_watcher().await.unwrap_err();

    assert_eq!(ui.toasts(), vec!["network error, please check connection"]);
    assert_eq!(ui.overlay_calls(), vec!["show:请求中...", "hide"]);
    let failure = error.transport_failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Connect);
    assert_eq!(failure.status, None);
}

#[tokio::test]
async fn test_timeout_reports_network_error() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::Timeout("timeout of 30000ms exceeded".to_string())));

    let (client, ui) = client_with(http);
    let error = ConfigApi::new(client).stop_watcher().await.unwrap_err();

    assert!(error.transport_failure().unwrap().is_timeout());
    assert_eq!(ui.toasts(), vec!["network error, please check connection"]);
}

#[tokio::test]
async fn test_suppressed_loading_shows_no_overlay() {
    let mut http = MockHttp::new();
    http.expect_execute().times(3).returning(|request| {
        if request.url.contains("/browse/autocomplete") {
            Err(BridgeError::Timeout("slow disk".to_string()))
        } else {
            Ok(json_response(
                200,
                &json!({
                    "current_path": "/media",
                    "parent_path": "/",
                    "items": [],
                    "total_items": 0,
                    "directories_count": 0,
                    "files_count": 0,
                    "status": "healthy",
                    "version": "1.0.0",
                    "services": { "scheduler": true, "watcher": true }
                }),
            ))
        }
    });

    let (client, ui) = client_with(http);

    BrowseApi::new(Arc::clone(&client))
        .browse(&BrowseQuery::path("/media"))
        .await
        .unwrap();
    SystemApi::new(Arc::clone(&client)).get_health().await.unwrap();
    BrowseApi::new(client)
        .autocomplete(&core_api::AutocompleteQuery::new("/me"))
        .await
        .unwrap_err();

    assert!(ui.overlay_calls().is_empty());
    assert_eq!(ui.toasts(), vec!["network error, please check connection"]);
}

#[tokio::test]
async fn test_export_logs_returns_raw_bytes() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .withf(|request| {
            request.url == "http://localhost:8000/api/logs/export?format_type=txt&limit=500"
        })
        .times(1)
        .returning(|_| Ok(response(200, b"2024-05-01 INFO scan finished\n")));

    let (client, ui) = client_with(http);
    let bytes = LogsApi::new(client)
        .export_logs(&ExportQuery {
            format_type: ExportFormat::Txt,
            limit: Some(500),
            level: None,
        })
        .await
        .unwrap();

    assert_eq!(bytes, Bytes::from_static(b"2024-05-01 INFO scan finished\n"));
    assert!(ui.calls().is_empty());
}

#[tokio::test]
async fn test_query_and_path_parameters_are_encoded() {
    let mut http = MockHttp::new();
    let mut sequence = mockall::Sequence::new();
    http.expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Delete
                && request.url
                    == "http://localhost:8000/api/config/watch/remove?directory=%2Fmedia%2Ftv%20shows"
        })
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(json_response(200, &json!({ "message": "ok" }))));
    http.expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Delete
                && request.url == "http://localhost:8000/api/config/schedule/remove/tv%20nightly"
        })
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(json_response(200, &json!({ "message": "ok" }))));
    http.expect_execute()
        .withf(|request| request.url == "http://localhost:8000/api/logs/clear?days=7")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(json_response(200, &json!({ "message": "ok" }))));

    let (client, _) = client_with(http);
    let config = ConfigApi::new(Arc::clone(&client));

    config.remove_watch_directory("/media/tv shows").await.unwrap();
    config.remove_scheduled_task("tv nightly").await.unwrap();
    LogsApi::new(client).clear_old_logs(7).await.unwrap();
}

#[tokio::test]
async fn test_request_interceptor_short_circuit_closes_overlay() {
    let mut http = MockHttp::new();
    http.expect_execute().times(0);

    let ui = Arc::new(RecordingUi::default());
    let reject = |_request: RequestDescriptor| -> Result<RequestDescriptor, ApiError> {
        Err(ApiError::Rejected("missing token".to_string()))
    };
    let client = ApiClient::builder(Arc::new(http), BASE, ui.clone(), ui.clone())
        .request_interceptor(Arc::new(reject))
        .build();

    let error = ConfigApi::new(Arc::new(client))
        .get_scheduled_tasks()
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Rejected(_)));
    assert_eq!(ui.overlay_calls(), vec!["show:请求中...", "hide"]);
    assert!(ui.toasts().is_empty());
}

#[tokio::test]
async fn test_interceptors_run_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut http = MockHttp::new();
    let seen = Arc::clone(&order);
    http.expect_execute()
        .withf(|request| request.headers.get("X-Hook").map(String::as_str) == Some("second"))
        .times(1)
        .returning(move |_| {
            seen.lock().unwrap().push("dispatch");
            Ok(json_response(200, &json!({ "is_running": true })))
        });

    let first_order = Arc::clone(&order);
    let first = move |request: RequestDescriptor| -> Result<RequestDescriptor, ApiError> {
        first_order.lock().unwrap().push("request:first");
        Ok(request.with_header("X-Hook", "first"))
    };
    let second_order = Arc::clone(&order);
    let second = move |request: RequestDescriptor| -> Result<RequestDescriptor, ApiError> {
        second_order.lock().unwrap().push("request:second");
        Ok(request.with_header("X-Hook", "second"))
    };
    let after_order = Arc::clone(&order);
    let after = move |_request: &RequestDescriptor, outcome: Outcome| -> Outcome {
        after_order.lock().unwrap().push("response");
        outcome
    };

    let ui = Arc::new(RecordingUi::default());
    let client = ApiClient::builder(Arc::new(http), BASE, ui.clone(), ui.clone())
        .request_interceptor(Arc::new(first))
        .request_interceptor(Arc::new(second))
        .response_interceptor(Arc::new(after))
        .build();

    let status = ConfigApi::new(Arc::new(client))
        .get_scheduler_status()
        .await
        .unwrap();

    assert!(status.is_running);
    assert_eq!(
        order.lock().unwrap().as_slice(),
        &["request:first", "request:second", "dispatch", "response"]
    );
}

#[tokio::test]
async fn test_response_interceptor_can_replace_outcome() {
    let recover = |_request: &RequestDescriptor, outcome: Outcome| -> Outcome {
        match outcome {
            Err(failure) if failure.status == Some(503) => {
                Ok(json_response(200, &json!({ "is_running": false })))
            }
            other => other,
        }
    };

    let ui = Arc::new(RecordingUi::default());
    let client = ApiClient::builder(
        Arc::new(single_response(503, json!({}))),
        BASE,
        ui.clone(),
        ui.clone(),
    )
    .response_interceptor(Arc::new(recover))
    .build();

    let status = ConfigApi::new(Arc::new(client))
        .get_scheduler_status()
        .await
        .unwrap();

    assert!(!status.is_running);
    assert!(ui.toasts().is_empty());
}

#[tokio::test]
async fn test_undecodable_success_body_is_not_notified() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(response(200, b"not json")));

    let (client, ui) = client_with(http);
    let error = ConfigApi::new(client).get_watch_status().await.unwrap_err();

    assert!(matches!(error, ApiError::Decode(_)));
    assert!(ui.toasts().is_empty());
    assert_eq!(ui.overlay_calls(), vec!["show:请求中...", "hide"]);
}

#[tokio::test]
async fn test_empty_success_body_is_null_payload() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(response(204, b"")));

    let (client, _) = client_with(http);
    let payload = client
        .send(RequestDescriptor::post("/logs/test"))
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(Value::Null));
}

#[tokio::test]
async fn test_request_events_are_published() {
    let bus = EventBus::new(32);
    let mut receiver = bus.subscribe();

    let ui = Arc::new(RecordingUi::default());
    let client = ApiClient::builder(
        Arc::new(single_response(200, json!({ "levels": [] }))),
        BASE,
        ui.clone(),
        ui.clone(),
    )
    .event_bus(bus)
    .build();

    LogsApi::new(Arc::new(client)).get_log_levels().await.unwrap();

    let mut requests = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        if let CoreEvent::Request(event) = event {
            requests.push(event);
        }
    }

    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0],
        RequestEvent::Started {
            method: "GET".to_string(),
            path: "/logs/levels".to_string(),
        }
    );
    assert!(matches!(
        requests[1],
        RequestEvent::Succeeded { status: 200, .. }
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_never_stack_overlays() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(16)
        .returning(|_| Ok(json_response(200, &json!({ "is_running": true }))));

    let (client, ui) = client_with(http);

    let calls: Vec<_> = (0..16)
        .map(|_| {
            let api = ConfigApi::new(Arc::clone(&client));
            tokio::spawn(async move { api.get_scheduler_status().await })
        })
        .collect();

    for call in calls {
        call.await.unwrap().unwrap();
    }

    let overlay = ui.overlay_calls();
    assert!(!overlay.is_empty());
    for pair in overlay.chunks(2) {
        assert_eq!(pair, ["show:请求中...", "hide"]);
    }
    assert!(!client.loading().is_active());
}
