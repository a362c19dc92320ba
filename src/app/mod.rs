//! Application module for webdesk
//!
//! This module contains the winit side of the shell:
//! - `App`: Entry point that initializes and runs the event loop
//! - `AppState`: `ApplicationHandler` that routes winit events to the `WindowManager`
//! - `WinitWindow` / `WinitHost`: the native window host

use crate::cli::RuntimeOptions;
use crate::config::Config;
use crate::single_instance::{PrimaryInstance, SecondInstanceMessage};
use crate::state_manager::{DescriptorDefaults, StateManager};
use crate::store::JsonFileStore;
use crate::window_manager::{ShellAction, WindowManager};
use anyhow::Result;
use std::sync::Arc;
use tokio::runtime::Runtime;
use winit::event_loop::{ControlFlow, EventLoop};

pub mod accelerators;
mod handler;
pub mod winit_window;

pub use handler::AppState;
pub use winit_window::{WinitHost, WinitWindow};

/// Events posted into the winit loop from outside a window event
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// Another launch handed its arguments over
    SecondInstance(SecondInstanceMessage),
    /// A shell command from a collaborator (menu, taskbar, ...)
    Action(ShellAction),
    /// A window finished navigating
    Navigated {
        window: crate::host::WindowId,
        url: String,
        in_page: bool,
    },
}

/// Main application entry point
pub struct App {
    config: Config,
    runtime: Arc<Runtime>,
    runtime_options: RuntimeOptions,
    instance: Option<PrimaryInstance>,
}

impl App {
    /// Create a new application
    pub fn new(
        config: Config,
        runtime: Arc<Runtime>,
        runtime_options: RuntimeOptions,
        instance: Option<PrimaryInstance>,
    ) -> Self {
        Self {
            config,
            runtime,
            runtime_options,
            instance,
        }
    }

    /// Run the application
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        let proxy = event_loop.create_proxy();

        if let Some(ref instance) = self.instance {
            let proxy = proxy.clone();
            instance.serve(&self.runtime, move |message| {
                if proxy
                    .send_event(UserEvent::SecondInstance(message))
                    .is_err()
                {
                    log::warn!("Event loop closed, dropping second-instance message");
                }
            })?;
        }

        let store_path = self.config.state_file_path();
        log::info!("Window state file: {}", store_path.display());
        let state_manager = StateManager::new(
            Box::new(JsonFileStore::new(store_path)),
            DescriptorDefaults::from_config(&self.config),
        );
        let manager = WindowManager::new(self.config, state_manager);

        let mut app_state = AppState::new(manager, self.runtime_options, proxy);
        event_loop.run_app(&mut app_state)?;

        // Keep the lock until the loop is done so later launches keep finding us
        drop(self.instance);
        Ok(())
    }
}
