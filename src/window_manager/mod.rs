//! Window orchestration for the desktop shell
//!
//! `WindowManager` ties the live window registry, the persisted layout and
//! the closed-window undo cache together. It is built once by the app and
//! passed explicitly to every handler; platform access arrives per call as a
//! `&mut dyn WindowHost`.
//!
//! The implementation is split across sub-modules:
//! - `registry`        : live windows and the descriptor backing each one
//! - `window_lifecycle`: window creation, startup restore, reopen, quit
//! - `event_dispatch`  : typed lifecycle events and page window-open requests
//! - `actions`         : user-facing commands (menus, accelerators, taskbar)

mod actions;
mod event_dispatch;
mod registry;
mod window_lifecycle;

pub use actions::ShellAction;
pub use registry::{RegistryEntry, WindowRegistry};

use crate::cacher::WindowStateCacher;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::descriptor::WindowDescriptor;
use crate::events::{LifecycleFault, NotificationHub, ShellNotification};
use crate::host::{HostWindow, WindowId};
use crate::state_manager::StateManager;
use std::sync::mpsc::Receiver;

/// Coordinates every shell window and its persisted state
pub struct WindowManager {
    /// Application configuration
    pub(crate) config: Config,
    /// Persisted window layout
    pub(crate) state_manager: StateManager,
    /// Live windows, in creation order
    pub(crate) registry: WindowRegistry,
    /// Recently closed windows available for undo
    pub(crate) cacher: WindowStateCacher,
    notifications: NotificationHub,
    faults: Vec<LifecycleFault>,
    /// Set once quit has started; per-window saves and the all-closed policy are skipped
    pub(crate) quitting: bool,
    /// Set while a batch of windows is being closed by the shell itself
    pub(crate) closing_all: bool,
    /// Flag to indicate if app should exit
    pub(crate) should_exit: bool,
    /// Trace every lifecycle event at info level
    log_events: bool,
}

impl WindowManager {
    /// Create a window manager using the system clock
    pub fn new(config: Config, state_manager: StateManager) -> Self {
        Self::with_clock(config, state_manager, Box::new(SystemClock))
    }

    /// Create a window manager whose undo cache reads time from `clock`
    pub fn with_clock(config: Config, state_manager: StateManager, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            state_manager,
            registry: WindowRegistry::default(),
            cacher: WindowStateCacher::new(clock),
            notifications: NotificationHub::new(),
            faults: Vec::new(),
            quitting: false,
            closing_all: false,
            should_exit: false,
            log_events: crate::debug::log_events_enabled(),
        }
    }

    /// Override lifecycle event tracing (normally taken from the environment)
    pub fn set_log_events(&mut self, enabled: bool) {
        self.log_events = enabled;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state_manager(&self) -> &StateManager {
        &self.state_manager
    }

    pub fn cacher_mut(&mut self) -> &mut WindowStateCacher {
        &mut self.cacher
    }

    /// Receive a [`ShellNotification`] for every navigation of every window.
    pub fn subscribe(&mut self) -> Receiver<ShellNotification> {
        self.notifications.subscribe()
    }

    pub(crate) fn publish(&mut self, notification: ShellNotification) {
        self.notifications.publish(notification);
    }

    /// Lifecycle inconsistencies seen so far. Empty in a healthy run.
    pub fn lifecycle_faults(&self) -> &[LifecycleFault] {
        &self.faults
    }

    pub(crate) fn record_fault(&mut self, fault: LifecycleFault) {
        log::error!("Lifecycle fault: {}", fault);
        self.faults.push(fault);
    }

    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    /// Live window ids in creation order
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.registry.ids()
    }

    pub fn window(&self, window_id: WindowId) -> Option<&dyn HostWindow> {
        self.registry
            .get(window_id)
            .map(|entry| entry.window.as_ref())
    }

    pub fn window_mut(&mut self, window_id: WindowId) -> Option<&mut (dyn HostWindow + 'static)> {
        self.registry
            .get_mut(window_id)
            .map(|entry| entry.window.as_mut())
    }

    /// Descriptor currently backing a live window
    pub fn descriptor(&self, window_id: WindowId) -> Option<&WindowDescriptor> {
        self.registry.get(window_id).map(|entry| &entry.descriptor)
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Refresh the undo cache from every live window.
    pub fn update_cache(&mut self) {
        let windows: Vec<&dyn HostWindow> = self
            .registry
            .iter()
            .map(|entry| entry.window.as_ref() as &dyn HostWindow)
            .collect();
        self.cacher.update_cache(&windows);
    }

    /// Raw persisted layout, for diagnostics
    pub fn windows_json(&self) -> Option<String> {
        self.state_manager.windows_json()
    }
}
