//! # Core Configuration Module
//!
//! Provides configuration management for the STRM Linker client core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all host bridges and transport settings. It enforces
//! fail-fast validation so a misconfigured client never issues a request.
//!
//! ## Transport Settings
//!
//! - API base address: `/api` in production, `http://localhost:8000/api` in
//!   development (overridable with `STRM_LINKER_API_BASE`)
//! - Timeout: fixed per client, 30 seconds by default
//! - Default headers: `Content-Type: application/json`
//!
//! ## Required Bridges
//!
//! - `HttpClient` - network round-trips
//! - `LoadingIndicator` - request overlay
//! - `Notifier` - toast notifications
//! - `DocumentTitle` - page title written by the navigation guards
//!
//! When the `desktop-shims` feature is enabled, desktop defaults from
//! `bridge-desktop` are injected for any bridge that was not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, Environment};
//!
//! let config = CoreConfig::builder()
//!     .environment(Environment::Development)
//!     .with_env_overrides()
//!     .build()
//!     .expect("Failed to build config");
//!
//! assert_eq!(config.api_base_url, "http://localhost:8000/api");
//! ```
//!
//! ## Error Handling
//!
//! Without `desktop-shims`, missing bridges produce
//! [`Error::CapabilityMissing`] with an actionable message.

use crate::error::{Error, Result};
use bridge_traits::{DocumentTitle, HttpClient, LoadingIndicator, Notifier};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Base address used by production builds (served from the same origin).
pub const PRODUCTION_API_BASE: &str = "/api";

/// Base address used during development against a local backend.
pub const DEVELOPMENT_API_BASE: &str = "http://localhost:8000/api";

/// Fixed request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Caption shown on the loading overlay.
pub const DEFAULT_LOADING_TEXT: &str = "请求中...";

/// Application name appended to page titles.
pub const DEFAULT_APP_NAME: &str = "STRM Linker";

/// Title used when a route carries no title metadata.
pub const DEFAULT_DOCUMENT_TITLE: &str = "STRM Linker - 字幕软链管理工具";

/// Environment variable selecting `production` or `development`.
pub const ENVIRONMENT_ENV: &str = "STRM_LINKER_ENV";

/// Environment variable overriding the API base address.
pub const API_BASE_ENV: &str = "STRM_LINKER_API_BASE";

const MAX_TIMEOUT: Duration = Duration::from_secs(600);

/// Build environment the client is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// Detect the environment from `STRM_LINKER_ENV`, falling back to the
    /// build profile (debug builds are development builds).
    pub fn detect() -> Self {
        std::env::var(ENVIRONMENT_ENV)
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or_else(Self::from_build_profile)
    }

    /// Parse `production`/`prod` or `development`/`dev` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    fn from_build_profile() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Base address for this environment
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_API_BASE,
            Self::Development => DEVELOPMENT_API_BASE,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
        }
    }
}

/// Core configuration for the STRM Linker client core.
///
/// This struct holds all bridges and settings required to construct the
/// transport core and the navigation pipeline. Use [`CoreConfigBuilder`] to
/// construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Environment the base address was derived from
    pub environment: Environment,

    /// Base address every API path is appended to
    pub api_base_url: String,

    /// Fixed timeout applied to every request
    pub timeout: Duration,

    /// Headers attached to every request
    pub default_headers: HashMap<String, String>,

    /// Caption of the loading overlay
    pub loading_text: String,

    /// Application name used as page title suffix
    pub app_name: String,

    /// Title used for routes without title metadata
    pub default_title: String,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,

    /// HTTP transport bridge
    pub http_client: Arc<dyn HttpClient>,

    /// Loading overlay bridge
    pub loading_indicator: Arc<dyn LoadingIndicator>,

    /// Toast notification bridge
    pub notifier: Arc<dyn Notifier>,

    /// Document title bridge
    pub document_title: Arc<dyn DocumentTitle>,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .field("default_headers", &self.default_headers)
            .field("loading_text", &self.loading_text)
            .field("app_name", &self.app_name)
            .field("default_title", &self.default_title)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("http_client", &"HttpClient { ... }")
            .field("loading_indicator", &"LoadingIndicator { ... }")
            .field("notifier", &"Notifier { ... }")
            .field("document_title", &"DocumentTitle { ... }")
            .finish()
    }
}

impl CoreConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base address is empty or neither absolute nor root-relative
    /// - The timeout is zero or longer than ten minutes
    /// - A default header has an empty name
    /// - The event buffer size is zero
    /// - The application name is empty
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.api_base_url)?;

        if self.timeout.is_zero() {
            return Err(Error::Config("Request timeout must be greater than 0".into()));
        }

        if self.timeout > MAX_TIMEOUT {
            return Err(Error::Config(format!(
                "Request timeout must not exceed {} seconds",
                MAX_TIMEOUT.as_secs()
            )));
        }

        if self.default_headers.keys().any(|name| name.trim().is_empty()) {
            return Err(Error::Config("Default header names must not be empty".into()));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config("Event buffer size must be greater than 0".into()));
        }

        if self.app_name.trim().is_empty() {
            return Err(Error::Config("Application name must not be empty".into()));
        }

        Ok(())
    }
}

fn validate_base_url(base: &str) -> Result<()> {
    if base.trim().is_empty() {
        return Err(Error::Config("API base URL must not be empty".into()));
    }

    let absolute = base.starts_with("http://") || base.starts_with("https://");
    if !absolute && !base.starts_with('/') {
        return Err(Error::Config(format!(
            "API base URL must be absolute (http/https) or start with '/': {}",
            base
        )));
    }

    Ok(())
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing(capability: &str, hint: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "No {} implementation provided. Desktop: enable the `desktop-shims` feature. \
             Browser: inject the adapter from `bridge-wasm`. {}",
            capability, hint
        ),
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    environment: Option<Environment>,
    api_base_url: Option<String>,
    timeout: Option<Duration>,
    default_headers: HashMap<String, String>,
    loading_text: Option<String>,
    app_name: Option<String>,
    default_title: Option<String>,
    event_buffer_size: Option<usize>,
    http_client: Option<Arc<dyn HttpClient>>,
    loading_indicator: Option<Arc<dyn LoadingIndicator>>,
    notifier: Option<Arc<dyn Notifier>>,
    document_title: Option<Arc<dyn DocumentTitle>>,
}

impl CoreConfigBuilder {
    /// Set the environment explicitly instead of detecting it.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Override the API base address.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Apply `STRM_LINKER_ENV` and `STRM_LINKER_API_BASE` when set.
    ///
    /// Values already set on the builder take precedence.
    pub fn with_env_overrides(mut self) -> Self {
        if self.environment.is_none() {
            self.environment = Some(Environment::detect());
        }
        if self.api_base_url.is_none() {
            self.api_base_url = std::env::var(API_BASE_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty());
        }
        self
    }

    /// Set the request timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Set the loading overlay caption.
    pub fn loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = Some(text.into());
        self
    }

    /// Set the application name used in page titles.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Set the title used for routes without title metadata.
    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    /// Set the event bus capacity.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Provide the HTTP client bridge.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Provide the loading overlay bridge.
    pub fn loading_indicator(mut self, indicator: Arc<dyn LoadingIndicator>) -> Self {
        self.loading_indicator = Some(indicator);
        self
    }

    /// Provide the notification bridge.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Provide the document title bridge.
    pub fn document_title(mut self, title: Arc<dyn DocumentTitle>) -> Self {
        self.document_title = Some(title);
        self
    }

    /// Build the configuration, injecting platform defaults where allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if a required bridge is missing and no default is
    /// available, or if [`CoreConfig::validate`] fails.
    pub fn build(self) -> Result<CoreConfig> {
        let environment = self.environment.unwrap_or_else(Environment::detect);
        let api_base_url = self
            .api_base_url
            .unwrap_or_else(|| environment.default_api_base().to_string());
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.extend(self.default_headers);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(timeout)?,
        };
        let loading_indicator = match self.loading_indicator {
            Some(indicator) => indicator,
            None => provide_default_loading_indicator()?,
        };
        let notifier = match self.notifier {
            Some(notifier) => notifier,
            None => provide_default_notifier()?,
        };
        let document_title = match self.document_title {
            Some(title) => title,
            None => provide_default_document_title()?,
        };

        let config = CoreConfig {
            environment,
            api_base_url,
            timeout,
            default_headers,
            loading_text: self
                .loading_text
                .unwrap_or_else(|| DEFAULT_LOADING_TEXT.to_string()),
            app_name: self.app_name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            default_title: self
                .default_title
                .unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string()),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(crate::events::DEFAULT_EVENT_BUFFER_SIZE),
            http_client,
            loading_indicator,
            notifier,
            document_title,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    let client = bridge_desktop::ReqwestHttpClient::with_timeout(timeout).map_err(|e| {
        Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: format!("Failed to create desktop HTTP client: {}", e),
        }
    })?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(capability_missing(
        "HttpClient",
        "Use CoreConfigBuilder::http_client to provide one.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_loading_indicator() -> Result<Arc<dyn LoadingIndicator>> {
    Ok(Arc::new(bridge_desktop::LogLoadingIndicator::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_loading_indicator() -> Result<Arc<dyn LoadingIndicator>> {
    Err(capability_missing(
        "LoadingIndicator",
        "Use CoreConfigBuilder::loading_indicator to provide one.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_notifier() -> Result<Arc<dyn Notifier>> {
    Ok(Arc::new(bridge_desktop::TracingNotifier))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_notifier() -> Result<Arc<dyn Notifier>> {
    Err(capability_missing(
        "Notifier",
        "Use CoreConfigBuilder::notifier to provide one.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_document_title() -> Result<Arc<dyn DocumentTitle>> {
    Ok(Arc::new(bridge_desktop::SharedDocumentTitle::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_document_title() -> Result<Arc<dyn DocumentTitle>> {
    Err(capability_missing(
        "DocumentTitle",
        "Use CoreConfigBuilder::document_title to provide one.",
    ))
}
