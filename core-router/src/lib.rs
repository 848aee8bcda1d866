//! # Navigation Pipeline
//!
//! Guarded page transitions for the STRM Linker control panel.
//!
//! A [`Router`] resolves a path against an ordered [`RouteTable`], runs the
//! pre-navigation guards, awaits the host's [`ViewLoader`], commits the view
//! and runs the post-navigation guards. Failures run the error hooks and leave
//! the previous view current.
//!
//! ```ignore
//! use core_router::Router;
//!
//! let router = Router::from_config(&config)?.event_bus(events.clone()).build();
//! router.navigate("/scan").await?;
//! ```

pub mod error;
pub mod guard;
pub mod route;
pub mod router;

pub use error::{Result, RouterError};
pub use guard::{
    AfterGuard, BeforeGuard, EagerViewLoader, ErrorHook, GuardOutcome, NotifyErrorHook,
    TitleGuard, ViewLoader, NAVIGATION_FAILURE_MESSAGE,
};
pub use route::{RouteMatch, RouteMeta, RouteRecord, RouteTable, CATCH_ALL_PATH};
pub use router::{NavigationOutcome, NavigationState, Router, RouterBuilder, MAX_REDIRECTS};
