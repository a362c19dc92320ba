//! Typed lifecycle event handling.
//!
//! Every native window event that matters to the core arrives here as a
//! [`LifecycleEvent`]. For a given window `Close` must precede `Closed`;
//! [`WindowManager::close_window`] is the one place that emits the pair.

use crate::descriptor::snapshot_window_state;
use crate::events::{
    AppCommand, LifecycleEvent, LifecycleFault, ShellNotification, WindowOpenDecision,
};
use crate::host::{WindowHost, WindowId};

use super::WindowManager;

impl WindowManager {
    /// Route one lifecycle event for `window_id`.
    pub fn dispatch(&mut self, host: &mut dyn WindowHost, window_id: WindowId, event: LifecycleEvent) {
        if self.log_events {
            log::info!("Window {} event: {:?}", window_id, event);
        }

        match event {
            LifecycleEvent::Close => self.on_window_close(window_id),
            LifecycleEvent::Closed => self.on_window_closed(host, window_id),
            LifecycleEvent::Navigated { url, in_page } => {
                self.on_window_navigated(window_id, url, in_page)
            }
            LifecycleEvent::AppCommand(command) => self.on_app_command(window_id, command),
        }
    }

    /// Close a window, delivering `Close` and then `Closed`.
    pub fn close_window(&mut self, host: &mut dyn WindowHost, window_id: WindowId) {
        if !self.registry.contains(window_id) {
            log::warn!("Close requested for unknown window {}", window_id);
            return;
        }
        self.dispatch(host, window_id, LifecycleEvent::Close);
        self.dispatch(host, window_id, LifecycleEvent::Closed);
    }

    /// A page asked to open `url` in a new window.
    ///
    /// The shell always opens the window itself, so it is tracked and
    /// persisted like any other, and the page's own request is denied.
    pub fn handle_window_open_request(
        &mut self,
        host: &mut dyn WindowHost,
        opener: WindowId,
        url: &str,
    ) -> WindowOpenDecision {
        log::info!("Window {} requested a new window for {}", opener, url);
        let descriptor = self.state_manager.defaults().descriptor(Some(url));
        self.create_new_window(host, descriptor);
        WindowOpenDecision::Deny
    }

    fn on_window_close(&mut self, window_id: WindowId) {
        let Some(entry) = self.registry.get_mut(window_id) else {
            log::warn!("Close event for unknown window {}", window_id);
            return;
        };
        if entry.closing {
            log::debug!("Window {} is already closing", window_id);
            return;
        }
        entry.closing = true;
        snapshot_window_state(entry.window.as_ref(), &mut entry.descriptor);

        if self.quitting || self.closing_all {
            log::debug!("Window {} closing as part of a batch, not saving", window_id);
        } else {
            self.state_manager
                .set_window_descriptors_state(self.registry.descriptors());
            self.state_manager.save("window closed");
        }

        if let Some(entry) = self.registry.get(window_id) {
            self.cacher.window_closing(entry.window.as_ref(), true);
        }
    }

    fn on_window_closed(&mut self, host: &mut dyn WindowHost, window_id: WindowId) {
        self.cacher.window_closed(window_id);

        let Some(entry) = self.registry.remove(window_id) else {
            self.record_fault(LifecycleFault::RegistryEntryMissing(window_id));
            return;
        };
        if !entry.closing {
            self.record_fault(LifecycleFault::ClosedBeforeClose(window_id));
        }
        drop(entry);
        log::info!(
            "Window {} closed ({} remaining)",
            window_id,
            self.registry.len()
        );

        if self.registry.is_empty() && !self.quitting && !self.closing_all {
            self.handle_all_windows_closed(host);
        }
    }

    fn on_window_navigated(&mut self, window_id: WindowId, url: String, in_page: bool) {
        if !self.registry.contains(window_id) {
            log::warn!("Navigation event for unknown window {}", window_id);
            return;
        }
        log::debug!(
            "Window {} navigated to {} (in page: {})",
            window_id,
            url,
            in_page
        );
        self.publish(ShellNotification::WindowNavigated {
            window: window_id,
            url,
            in_page,
        });
    }

    fn on_app_command(&mut self, window_id: WindowId, command: AppCommand) {
        let Some(entry) = self.registry.get_mut(window_id) else {
            log::warn!("App command for unknown window {}", window_id);
            return;
        };
        let window = entry.window.as_mut();
        match command {
            AppCommand::BrowserBackward if window.can_go_back() => window.go_back(),
            AppCommand::BrowserForward if window.can_go_forward() => window.go_forward(),
            _ => log::debug!("Window {} cannot handle {:?} now", window_id, command),
        }
    }
}
