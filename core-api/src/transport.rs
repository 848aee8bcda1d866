//! Transport Core
//!
//! [`ApiClient`] is the single path every backend call takes. Per call it:
//!
//! 1. opens the loading overlay (unless the descriptor suppresses it)
//! 2. runs request interceptors in registration order
//! 3. builds the URL and dispatches through the [`HttpClient`] bridge
//! 4. turns non-2xx statuses into a [`TransportFailure`]
//! 5. runs response interceptors, then the built-in failure notifier
//! 6. closes the overlay
//! 7. returns the response body, or the original failure
//!
//! The overlay is held by an RAII guard so step 6 also happens when an
//! interceptor short-circuits the call. There is no retry and no cache.

use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::ui::{LoadingIndicator, Notifier};
use bytes::Bytes;
use chrono::Utc;
use core_runtime::config::{CoreConfig, DEFAULT_LOADING_TEXT, DEFAULT_TIMEOUT};
use core_runtime::events::{CoreEvent, EventBus, RequestEvent};
use core_runtime::logging::redact_if_sensitive;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};

use crate::descriptor::{RequestDescriptor, ResponseType};
use crate::error::{ApiError, Result, TransportFailure};
use crate::interceptor::{NotifyOnFailure, Outcome, RequestInterceptor, ResponseInterceptor};
use crate::loading::{LoadingCoordinator, LoadingGuard};

/// Body of a successful response
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Binary(Bytes),
}

impl Payload {
    /// Decode a JSON payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
            }
            Payload::Binary(_) => Err(ApiError::Decode(
                "binary payload cannot be decoded as JSON".to_string(),
            )),
        }
    }

    /// Raw bytes of a binary payload.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Payload::Binary(bytes) => Ok(bytes),
            Payload::Json(_) => Err(ApiError::Decode(
                "expected a binary payload, got JSON".to_string(),
            )),
        }
    }
}

/// HTTP client wrapper shared by every facade
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
    default_headers: HashMap<String, String>,
    loading: Arc<LoadingCoordinator>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    failure_notifier: NotifyOnFailure,
    events: Option<EventBus>,
}

impl ApiClient {
    pub fn builder(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        loading_indicator: Arc<dyn LoadingIndicator>,
        notifier: Arc<dyn Notifier>,
    ) -> ApiClientBuilder {
        ApiClientBuilder {
            http,
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: HashMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
            loading_indicator,
            loading_text: DEFAULT_LOADING_TEXT.to_string(),
            notifier,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            events: None,
        }
    }

    /// Builder pre-filled from a validated [`CoreConfig`].
    pub fn from_config(config: &CoreConfig) -> ApiClientBuilder {
        let mut builder = Self::builder(
            Arc::clone(&config.http_client),
            config.api_base_url.clone(),
            Arc::clone(&config.loading_indicator),
            Arc::clone(&config.notifier),
        )
        .timeout(config.timeout)
        .loading_text(config.loading_text.clone());

        for (name, value) in &config.default_headers {
            builder = builder.default_header(name.clone(), value.clone());
        }

        builder
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn loading(&self) -> &Arc<LoadingCoordinator> {
        &self.loading
    }

    /// Issue one call and return its body.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method(), path = descriptor.path()))]
    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<Payload> {
        let loading = descriptor
            .show_loading()
            .then(|| LoadingGuard::open(&self.loading));

        let descriptor = self.run_request_interceptors(descriptor)?;
        let request = self.build_http_request(&descriptor)?;

        let method = descriptor.method().to_string();
        let path = descriptor.path().to_string();

        debug!(url = %request.url, "Dispatching request");
        self.emit(RequestEvent::Started {
            method: method.clone(),
            path: path.clone(),
        });

        let started = Utc::now();
        let outcome: Outcome = match self.http.execute(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(TransportFailure::from_response(response)),
            Err(error) => Err(TransportFailure::from(error)),
        };
        let elapsed_ms = (Utc::now() - started).num_milliseconds().max(0) as u64;

        let outcome = self
            .response_interceptors
            .iter()
            .fold(outcome, |outcome, interceptor| {
                interceptor.on_response(&descriptor, outcome)
            });
        let outcome = self.failure_notifier.on_response(&descriptor, outcome);

        drop(loading);

        let response = outcome?;

        debug!(status = response.status, elapsed_ms, "Request succeeded");
        self.emit(RequestEvent::Succeeded {
            method,
            path,
            status: response.status,
            elapsed_ms,
        });

        match descriptor.response_type() {
            ResponseType::Binary => Ok(Payload::Binary(response.body)),
            ResponseType::Json if response.body.is_empty() => Ok(Payload::Json(Value::Null)),
            ResponseType::Json => serde_json::from_slice(&response.body)
                .map(Payload::Json)
                .map_err(|e| ApiError::Decode(e.to_string())),
        }
    }

    /// Issue one call and decode its JSON body into `T`.
    pub async fn request<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.send(descriptor).await?.decode()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(RequestDescriptor::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.request(RequestDescriptor::post(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(RequestDescriptor::delete(path)).await
    }

    fn run_request_interceptors(&self, descriptor: RequestDescriptor) -> Result<RequestDescriptor> {
        let method = descriptor.method().to_string();
        let path = descriptor.path().to_string();

        self.request_interceptors
            .iter()
            .try_fold(descriptor, |descriptor, interceptor| {
                interceptor.on_request(descriptor)
            })
            .map_err(|error| {
                warn!(%method, %path, "Request short-circuited: {}", error);
                self.emit(RequestEvent::Rejected {
                    method,
                    path,
                    reason: error.to_string(),
                });
                error
            })
    }

    fn build_http_request(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest> {
        let mut request = HttpRequest::new(descriptor.method(), descriptor.url(&self.base_url))
            .timeout(self.timeout);

        for (name, value) in self.default_headers.iter().chain(descriptor.headers()) {
            request = request.header(name.clone(), value.clone());
        }

        if let Some(body) = descriptor.body() {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApiError::InvalidRequest(format!("request body: {}", e)))?;
            request = request.body(Bytes::from(bytes));
        }

        for (name, value) in &request.headers {
            trace!(header = %name, value = %redact_if_sensitive(name, value), "Request header");
        }

        Ok(request)
    }

    fn emit(&self, event: RequestEvent) {
        if let Some(events) = &self.events {
            events.emit(CoreEvent::Request(event)).ok();
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("default_headers", &self.default_headers)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish()
    }
}

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    http: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
    default_headers: HashMap<String, String>,
    loading_indicator: Arc<dyn LoadingIndicator>,
    loading_text: String,
    notifier: Arc<dyn Notifier>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    events: Option<EventBus>,
}

impl ApiClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    /// Append a request interceptor; interceptors run in the order added.
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    /// Append a response interceptor; it runs before the failure notifier.
    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> ApiClient {
        let mut loading = LoadingCoordinator::new(self.loading_indicator, self.loading_text);
        let mut failure_notifier = NotifyOnFailure::new(self.notifier);

        if let Some(events) = &self.events {
            loading = loading.with_event_bus(events.clone());
            failure_notifier = failure_notifier.with_event_bus(events.clone());
        }

        ApiClient {
            http: self.http,
            base_url: self.base_url,
            timeout: self.timeout,
            default_headers: self.default_headers,
            loading: Arc::new(loading),
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
            failure_notifier,
            events: self.events,
        }
    }
}
