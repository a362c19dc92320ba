//! Platform seam between the window core and the native windowing system.
//!
//! The core never touches a windowing toolkit directly. Live windows are
//! `Box<dyn HostWindow>` values created through a [`WindowHost`], which lets
//! the winit adapter in `app` and the mock host used by tests share every
//! line of lifecycle logic.

use crate::descriptor::Bounds;
use std::fmt;
use thiserror::Error;

/// Identity of a live native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameters for creating a native window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    /// Inner size; `None` lets the platform choose
    pub size: Option<(u32, u32)>,
    /// Outer position; `None` lets the platform choose
    pub position: Option<(i32, i32)>,
    /// Windows are created hidden and shown once loaded, to avoid a visible maximize
    pub visible: bool,
}

/// Errors raised by a [`WindowHost`].
#[derive(Debug, Error)]
pub enum HostError {
    /// The platform refused to create the window.
    #[error("Failed to create window: {0}")]
    CreateWindow(String),
}

/// A live native window hosting a web page.
///
/// Implementations own the OS handle. Dropping the value destroys the window.
pub trait HostWindow {
    fn id(&self) -> WindowId;

    fn is_maximized(&self) -> bool;

    fn is_minimized(&self) -> bool;

    /// Current outer position and inner size.
    fn bounds(&self) -> Bounds;

    /// Text currently in the native title bar. This is what gets persisted
    /// as the descriptor title; hosts without a page title report the URL.
    fn title(&self) -> String;

    /// URL of the page currently shown. May be the blank-page sentinel after
    /// a failed navigation.
    fn current_url(&self) -> String;

    /// Navigate to `url`.
    fn load_url(&mut self, url: &str);

    fn maximize(&mut self);

    fn show(&mut self);

    /// Restore from minimized.
    fn restore(&mut self);

    fn focus(&mut self);

    fn can_go_back(&self) -> bool;

    fn go_back(&mut self);

    fn can_go_forward(&self) -> bool;

    fn go_forward(&mut self);
}

/// Factory for native windows, borrowed for the duration of one event.
pub trait WindowHost {
    fn create_window(&mut self, options: &WindowOptions) -> Result<Box<dyn HostWindow>, HostError>;
}
