//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the STRM Linker client core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the transport core and the
//! navigation pipeline depend on. It establishes the configuration surface,
//! logging conventions, and event broadcasting mechanism used throughout the
//! workspace.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
