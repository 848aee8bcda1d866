//! Domain API facades
//!
//! Thin, per-domain groupings of single-shot calls. Each operation only
//! places its parameters (path, query or body), picks the loading and
//! response-type options, and delegates to [`ApiClient`](crate::ApiClient).

mod browse;
mod config;
mod logs;
mod system;

pub use browse::BrowseApi;
pub use config::ConfigApi;
pub use logs::LogsApi;
pub use system::SystemApi;
