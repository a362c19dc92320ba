// Library exports for testing and potential library use
//
// The window core (descriptor, store, state_manager, cacher, events,
// window_manager) never touches winit; it talks to native windows through
// the `host` traits. `app` is the only module that depends on winit.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod app;
pub mod cacher;
pub mod cli;
pub mod clock;
pub mod config;
pub mod descriptor;
pub mod events;
pub mod host;
pub mod single_instance;
pub mod state_manager;
pub mod store;
pub mod window_manager;
