//! Shell configuration management.
//!
//! Re-exports all configuration types from the `webdesk-config` crate.

pub use webdesk_config::*;
