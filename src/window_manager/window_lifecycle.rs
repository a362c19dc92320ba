//! Window creation, startup restore, undo-reopen and quit.

use crate::config::AllWindowsClosedAction;
use crate::descriptor::{WindowDescriptor, is_url_invalid, snapshot_window_state};
use crate::host::{WindowHost, WindowId, WindowOptions};
use crate::single_instance::SecondInstanceMessage;

use super::WindowManager;
use super::registry::RegistryEntry;

impl WindowManager {
    /// Open every window of the saved layout.
    ///
    /// A saved layout with no windows is reset to the default before opening.
    pub fn open_windows(&mut self, host: &mut dyn WindowHost) {
        let mut descriptors = self.state_manager.get_windows();
        if descriptors.is_empty() {
            log::warn!("Saved layout has no windows, resetting to default");
            self.state_manager.reset_saved_windows_state();
            descriptors = self.state_manager.get_windows();
        }

        log::info!("Opening {} windows", descriptors.len());
        for descriptor in descriptors {
            self.create_new_window(host, descriptor);
        }
    }

    /// Open one window on `url` (or the default page) at the default size.
    pub fn open_new_window(
        &mut self,
        host: &mut dyn WindowHost,
        url: Option<&str>,
    ) -> Option<WindowId> {
        let descriptor = self.state_manager.defaults().descriptor(url);
        self.create_new_window(host, descriptor)
    }

    /// Create, show and register a window for `descriptor`.
    ///
    /// The window starts hidden under the loading title and is shown once its
    /// geometry is applied. Returns `None` when the platform refuses to create it.
    pub(crate) fn create_new_window(
        &mut self,
        host: &mut dyn WindowHost,
        mut descriptor: WindowDescriptor,
    ) -> Option<WindowId> {
        if is_url_invalid(Some(&descriptor.url)) {
            log::warn!(
                "Invalid URL {:?} in window descriptor, using default",
                descriptor.url
            );
            descriptor.url = self.state_manager.defaults().url.clone();
        }

        let options = WindowOptions {
            title: self.config.loading_window_title.clone(),
            size: descriptor.size(),
            position: descriptor.position(),
            visible: false,
        };

        let mut window = match host.create_window(&options) {
            Ok(window) => window,
            Err(e) => {
                log::error!("Failed to create window for {}: {}", descriptor.url, e);
                return None;
            }
        };

        if descriptor.is_maximized() {
            window.maximize();
        }
        window.load_url(&descriptor.url);
        window.show();

        let window_id = window.id();
        log::info!(
            "Created window {} ({}, size: {:?}, position: {:?}, maximized: {})",
            window_id,
            descriptor.url,
            options.size,
            options.position,
            descriptor.is_maximized()
        );

        self.cacher.add_new_window(window.as_ref(), &descriptor);
        self.registry.insert(RegistryEntry::new(window, descriptor));
        Some(window_id)
    }

    /// Reopen the most recently closed window if it is still in the undo cache.
    pub fn reopen_last_closed_window(&mut self, host: &mut dyn WindowHost) -> Option<WindowId> {
        let state = self.cacher.pop_last_closed_window()?;
        log::info!(
            "Reopening window {} ({})",
            state.window_id,
            state.descriptor.url
        );
        self.create_new_window(host, state.descriptor)
    }

    /// Bring the first window to the front, restoring it if minimized.
    pub fn focus_first_window(&mut self) {
        let Some(entry) = self.registry.first_mut() else {
            log::debug!("No window to focus");
            return;
        };
        if entry.window.is_minimized() {
            entry.window.restore();
        }
        entry.window.focus();
    }

    /// React to another launch of the application.
    pub fn handle_second_instance(
        &mut self,
        host: &mut dyn WindowHost,
        message: &SecondInstanceMessage,
    ) {
        log::info!("Second instance launched with args {:?}", message.args);
        if message.new_window {
            self.open_new_window(host, message.url.as_deref());
        } else {
            self.focus_first_window();
        }
    }

    /// Apply the configured policy once the last window has closed.
    pub(crate) fn handle_all_windows_closed(&mut self, host: &mut dyn WindowHost) {
        let action = self.config.all_windows_closed.resolve();
        log::info!("All windows closed, action: {:?}", action);
        match action {
            AllWindowsClosedAction::ResetAndReopen => {
                self.cacher.forget_closed_windows();
                self.state_manager.reset_saved_windows_state();
                self.open_windows(host);
            }
            AllWindowsClosedAction::Reopen => {
                self.cacher.forget_closed_windows();
                self.open_windows(host);
            }
            AllWindowsClosedAction::Quit => self.should_exit = true,
            AllWindowsClosedAction::PlatformDefault => {
                log::error!("All-windows-closed policy was not resolved, quitting");
                self.should_exit = true;
            }
        }
    }

    /// Close every live window without persisting each one individually.
    pub(crate) fn close_all_windows(&mut self, host: &mut dyn WindowHost) {
        self.closing_all = true;
        for window_id in self.registry.ids() {
            self.close_window(host, window_id);
        }
        self.cacher.forget_closed_windows();
        self.closing_all = false;
    }

    /// Persist every live window in one write, close them all and request exit.
    pub fn quit(&mut self, host: &mut dyn WindowHost) {
        if self.quitting {
            log::debug!("Quit already in progress");
            return;
        }
        log::info!("Quitting, saving {} windows", self.registry.len());

        for entry in self.registry.iter_mut() {
            snapshot_window_state(entry.window.as_ref(), &mut entry.descriptor);
        }
        if self.registry.is_empty() {
            log::info!("No open windows, keeping last saved layout");
        } else {
            self.state_manager
                .set_window_descriptors_state(self.registry.descriptors());
            self.state_manager.save("before quit");
        }

        self.quitting = true;
        self.close_all_windows(host);
        self.should_exit = true;

        log::info!(
            "Final window state JSON: {}",
            self.state_manager.windows_json().unwrap_or_default()
        );
    }

    /// Discard the saved layout and replace every open window with the default set.
    pub fn reset_windows(&mut self, host: &mut dyn WindowHost) {
        log::info!("Resetting windows to default layout");
        self.close_all_windows(host);
        self.state_manager.reset_saved_windows_state();
        self.open_windows(host);
    }
}
