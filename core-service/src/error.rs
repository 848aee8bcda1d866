use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("API error: {0}")]
    Api(#[from] core_api::ApiError),

    #[error("Router error: {0}")]
    Router(#[from] core_router::RouterError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
