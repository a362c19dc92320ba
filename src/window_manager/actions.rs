//! User-facing shell commands.
//!
//! Menus, keyboard accelerators and taskbar entries all funnel into
//! [`ShellAction`]; none of them reach into the window manager directly.

use crate::host::WindowHost;

use super::WindowManager;

/// A command the user can issue to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Open a window on the given URL, or the default page
    NewWindow(Option<String>),
    /// Undo the most recent window close
    ReopenClosedWindow,
    FocusFirstWindow,
    /// Replace the saved and current layout with the default window
    ResetWindows,
    Quit,
}

impl WindowManager {
    pub fn handle_action(&mut self, host: &mut dyn WindowHost, action: ShellAction) {
        log::info!("Handling action {:?}", action);
        match action {
            ShellAction::NewWindow(url) => {
                self.open_new_window(host, url.as_deref());
            }
            ShellAction::ReopenClosedWindow => {
                if self.reopen_last_closed_window(host).is_none() {
                    log::debug!("No recently closed window to reopen");
                }
            }
            ShellAction::FocusFirstWindow => self.focus_first_window(),
            ShellAction::ResetWindows => self.reset_windows(host),
            ShellAction::Quit => self.quit(host),
        }
    }
}
