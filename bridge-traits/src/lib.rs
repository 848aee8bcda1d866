//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the STRM Linker client core and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that is provided differently on each host (a desktop
//! shell versus a browser page).
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - One-shot async HTTP round-trips
//!
//! ### User Interface
//! - [`LoadingIndicator`](ui::LoadingIndicator) - Blocking "request in progress" overlay
//! - [`Notifier`](ui::Notifier) - Toast notifications
//! - [`DocumentTitle`](ui::DocumentTitle) - Window/tab title
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate |
//! |----------|---------------------|
//! | Desktop  | `bridge-desktop`    |
//! | Web      | `bridge-wasm`       |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. HTTP
//! implementations in particular must keep timeouts and connection failures
//! distinguishable ([`BridgeError::Timeout`], [`BridgeError::ConnectionFailed`])
//! because the core classifies them differently from HTTP status failures.
//!
//! ## Thread Safety
//!
//! On native targets all bridge traits require `Send + Sync`; on `wasm32` the
//! bound is relaxed through [`PlatformSendSync`](platform::PlatformSendSync).
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod platform;
pub mod ui;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use ui::{DocumentTitle, LoadingIndicator, Notification, NotificationLevel, Notifier};
