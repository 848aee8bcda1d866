//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides implementations of the bridge traits using
//! desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `LoadingIndicator` and `Notifier` mirrored into `tracing`
//! - `DocumentTitle` kept in memory for the host shell
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TracingNotifier};
//! use bridge_traits::HttpClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new().expect("http client");
//!     let notifier = TracingNotifier;
//!
//!     // Use in core configuration
//! }
//! ```

mod http;
mod ui;

pub use http::ReqwestHttpClient;
pub use ui::{LogLoadingIndicator, SharedDocumentTitle, TracingNotifier};
