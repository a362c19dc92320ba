//! Configuration system for the webdesk window shell.
//!
//! This crate provides configuration loading, saving, and default values:
//!
//! - The [`Config`] struct and its YAML persistence
//! - Default values for the hosted page and window geometry
//! - The policy applied when every window has been closed
//! - Typed errors for config I/O and validation

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{AllWindowsClosedAction, LogLevel};
