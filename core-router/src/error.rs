use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Invalid route definition: {0}")]
    InvalidRoute(String),

    #[error("No route matches path: {0}")]
    NoMatch(String),

    #[error("Unknown route name: {0}")]
    UnknownRouteName(String),

    #[error("Route '{route}' requires parameter '{param}'")]
    MissingParam { route: String, param: String },

    #[error("Failed to load view '{component}': {message}")]
    ViewLoad { component: String, message: String },

    #[error("Navigation guard failed: {0}")]
    Guard(String),

    #[error("Navigation to {path} exceeded {limit} redirects")]
    RedirectLimit { path: String, limit: usize },
}

pub type Result<T> = std::result::Result<T, RouterError>;
