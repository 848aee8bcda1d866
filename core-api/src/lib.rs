//! # STRM Linker API Client
//!
//! The transport core of the control panel: every backend call goes through
//! [`ApiClient`], which owns the loading overlay lifecycle, runs the
//! interceptor chains and classifies failures into user notifications.
//!
//! ## Overview
//!
//! - [`descriptor`] - immutable [`RequestDescriptor`] values
//! - [`loading`] - the single-overlay [`LoadingCoordinator`]
//! - [`classify`] - failure categories and error toasts
//! - [`interceptor`] - request/response hooks
//! - [`transport`] - [`ApiClient`] itself
//! - [`facades`] - per-domain operations (`ConfigApi`, `LogsApi`, `BrowseApi`, `SystemApi`)
//! - [`models`] - backend request/response types
//!
//! ## Usage
//!
//! ```ignore
//! use core_api::{ApiClient, ConfigApi, ScanConfig};
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder().build()?;
//! let client = Arc::new(ApiClient::from_config(&config).build());
//! let result = ConfigApi::new(client).scan(&ScanConfig::new("/media/tv")).await?;
//! println!("created {} links", result.created_links);
//! ```
//!
//! ## Errors
//!
//! A failed call resolves to [`ApiError::Transport`] carrying the original
//! [`TransportFailure`]. The classified, user-facing message only reaches the
//! host [`Notifier`](bridge_traits::ui::Notifier).

pub mod classify;
pub mod descriptor;
pub mod error;
pub mod facades;
pub mod interceptor;
pub mod loading;
pub mod models;
pub mod transport;

pub use classify::{classify, ClassifiedError, ErrorCategory};
pub use descriptor::{RequestDescriptor, ResponseType};
pub use error::{ApiError, FailureKind, Result, TransportFailure};
pub use facades::{BrowseApi, ConfigApi, LogsApi, SystemApi};
pub use interceptor::{NotifyOnFailure, Outcome, RequestInterceptor, ResponseInterceptor};
pub use loading::{LoadingCoordinator, LoadingHandle};
pub use models::*;
pub use transport::{ApiClient, ApiClientBuilder, Payload};
