//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, loading
//! overlay, toasts, document title) into the transport core and the
//! navigation pipeline. Desktop apps typically enable the `desktop-shims`
//! feature (which depends on `bridge-desktop`), whereas WebAssembly builds
//! enable the `wasm` feature and rely on the adapters from `bridge-wasm`.
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//!
//! let core = CoreService::new(CoreConfig::builder().with_env_overrides().build()?)?;
//! let health = core.system_api().get_health().await?;
//! core.router().navigate("/scan").await?;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_api::{
    ApiClient, BrowseApi, ConfigApi, LogsApi, RequestInterceptor, ResponseInterceptor, SystemApi,
};
use core_router::{AfterGuard, BeforeGuard, ErrorHook, Router, ViewLoader};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use core_runtime::logging::{init_logging, LoggingConfig};
use tracing::info;

#[cfg(feature = "wasm")]
pub use bridge_wasm::WasmBridgeConfig;
#[cfg(feature = "wasm")]
use bridge_wasm::{build_wasm_bridges, WasmBridgeSet};

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share the client, the router and the event bus.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    events: EventBus,
    client: Arc<ApiClient>,
    router: Arc<Router>,
}

impl CoreService {
    /// Create a service with the default interceptor and guard setup.
    pub fn new(config: CoreConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: CoreConfig) -> CoreServiceBuilder {
        CoreServiceBuilder {
            config,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            before_guards: Vec::new(),
            after_guards: Vec::new(),
            error_hooks: Vec::new(),
            view_loader: None,
            logging: None,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Shared transport used by every facade.
    pub fn client(&self) -> Arc<ApiClient> {
        Arc::clone(&self.client)
    }

    pub fn config_api(&self) -> ConfigApi {
        ConfigApi::new(self.client())
    }

    pub fn logs_api(&self) -> LogsApi {
        LogsApi::new(self.client())
    }

    pub fn browse_api(&self) -> BrowseApi {
        BrowseApi::new(self.client())
    }

    pub fn system_api(&self) -> SystemApi {
        SystemApi::new(self.client())
    }

    pub fn router(&self) -> Arc<Router> {
        Arc::clone(&self.router)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to every event published by the client and the router.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }
}

impl std::fmt::Debug for CoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreService")
            .field("client", &self.client)
            .field("router", &self.router)
            .finish()
    }
}

/// Builder for [`CoreService`]
///
/// Interceptors and guards added here run after the built-in ones: request
/// interceptors after none, response interceptors before the failure
/// notifier, pre-navigation guards after the title guard, error hooks after
/// the notifying hook.
pub struct CoreServiceBuilder {
    config: CoreConfig,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    before_guards: Vec<Arc<dyn BeforeGuard>>,
    after_guards: Vec<Arc<dyn AfterGuard>>,
    error_hooks: Vec<Arc<dyn ErrorHook>>,
    view_loader: Option<Arc<dyn ViewLoader>>,
    logging: Option<LoggingConfig>,
}

impl CoreServiceBuilder {
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

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
        self.view_loader = Some(loader);
        self
    }

    /// Install the global `tracing` subscriber during [`build`](Self::build).
    ///
    /// Leave unset when the host installs its own subscriber.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Validate the configuration and assemble the client and the router.
    pub fn build(self) -> Result<CoreService> {
        self.config.validate()?;

        if let Some(logging) = self.logging {
            init_logging(logging)?;
        }

        let events = EventBus::new(self.config.event_buffer_size);

        let mut client = ApiClient::from_config(&self.config).event_bus(events.clone());
        for interceptor in self.request_interceptors {
            client = client.request_interceptor(interceptor);
        }
        for interceptor in self.response_interceptors {
            client = client.response_interceptor(interceptor);
        }

        let mut router = Router::from_config(&self.config)?.event_bus(events.clone());
        for guard in self.before_guards {
            router = router.before_guard(guard);
        }
        for guard in self.after_guards {
            router = router.after_guard(guard);
        }
        for hook in self.error_hooks {
            router = router.error_hook(hook);
        }
        if let Some(loader) = self.view_loader {
            router = router.view_loader(loader);
        }

        info!(
            environment = %self.config.environment,
            api_base_url = %self.config.api_base_url,
            "Core service initialized"
        );

        Ok(CoreService {
            config: Arc::new(self.config),
            events,
            client: Arc::new(client.build()),
            router: Arc::new(router.build()),
        })
    }
}

#[cfg(feature = "wasm")]
fn config_from_bridges(bridges: WasmBridgeSet) -> Result<CoreConfig> {
    Ok(CoreConfig::builder()
        .with_env_overrides()
        .http_client(bridges.http_client)
        .loading_indicator(bridges.loading_indicator)
        .notifier(bridges.notifier)
        .document_title(bridges.document_title)
        .build()?)
}

/// Convenience bootstrapper for WebAssembly hosts.
///
/// ```
/// # #[cfg(feature = "wasm")]
/// # async fn example() -> core_service::Result<()> {
/// use core_service::{bootstrap_wasm, WasmBridgeConfig};
///
/// let core = bootstrap_wasm(WasmBridgeConfig::new())?;
/// core.router().navigate("/").await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "wasm")]
pub fn bootstrap_wasm(config: WasmBridgeConfig) -> Result<CoreService> {
    let bridges = build_wasm_bridges(config)
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;
    let config = config_from_bridges(bridges)?;
    let logging = LoggingConfig::for_environment(config.environment);
    CoreService::builder(config).logging(logging).build()
}
