//! Typed window lifecycle events and the notifications the core publishes.
//!
//! For any one window, [`LifecycleEvent::Close`] is always delivered strictly
//! before [`LifecycleEvent::Closed`]. Close runs while the window is still
//! live and can be snapshotted; Closed runs after it is gone.

use crate::host::WindowId;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

/// Event delivered to the window manager for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The window is about to close and is still fully usable.
    Close,
    /// The window has been destroyed.
    Closed,
    /// The window finished a navigation, including same-page (anchor) ones.
    Navigated { url: String, in_page: bool },
    /// A hardware or OS application command targeted the window.
    AppCommand(AppCommand),
}

/// Application commands coming from mouse side buttons or media keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    BrowserBackward,
    BrowserForward,
}

/// Answer to a page's request to open a new window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOpenDecision {
    /// The page may not create the window itself; the shell opens its own.
    Deny,
}

/// Notifications for collaborators outside the core (title updates, etc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellNotification {
    WindowNavigated {
        window: WindowId,
        url: String,
        in_page: bool,
    },
}

/// Lifecycle inconsistencies the window manager detected and survived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleFault {
    #[error("Closed event for window {0} which has no registry entry")]
    RegistryEntryMissing(WindowId),
    #[error("Closed event for window {0} arrived before its close event")]
    ClosedBeforeClose(WindowId),
}

/// Fan-out of [`ShellNotification`]s to any number of subscribers.
///
/// Subscribers that dropped their receiver are pruned on the next publish.
#[derive(Debug, Default)]
pub struct NotificationHub {
    subscribers: Vec<Sender<ShellNotification>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<ShellNotification> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, notification: ShellNotification) {
        self.subscribers
            .retain(|subscriber| subscriber.send(notification.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
