//! Native windows backed by winit.
//!
//! Pages are not rendered; a `WinitWindow` keeps the URL history a web view
//! would, shows the current page in the title bar and reports every
//! navigation back to the event loop.

use super::UserEvent;
use crate::descriptor::Bounds;
use crate::host::{HostError, HostWindow, WindowHost, WindowId, WindowOptions};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::Window;

/// Convert a winit window id into the shell's id.
pub fn host_window_id(id: winit::window::WindowId) -> WindowId {
    WindowId(u64::from(id))
}

pub struct WinitWindow {
    window: Window,
    proxy: EventLoopProxy<UserEvent>,
    history: Vec<String>,
    /// Index of the current page in `history`
    position: usize,
    title: String,
}

impl WinitWindow {
    fn new(window: Window, proxy: EventLoopProxy<UserEvent>) -> Self {
        let title = window.title();
        Self {
            window,
            proxy,
            history: Vec::new(),
            position: 0,
            title,
        }
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
        self.title = title.to_string();
    }

    /// Show the current page and tell the event loop about it. There is no
    /// page title to show, so the title bar (and the saved title) is the URL.
    fn navigated(&mut self, in_page: bool) {
        let Some(url) = self.history.get(self.position).cloned() else {
            return;
        };
        self.set_title(&url);
        let event = UserEvent::Navigated {
            window: self.id(),
            url,
            in_page,
        };
        if self.proxy.send_event(event).is_err() {
            log::debug!("Event loop closed, dropping navigation for {}", self.id());
        }
    }

    fn same_page(a: &str, b: &str) -> bool {
        let strip = |url: &str| url.split('#').next().unwrap_or(url).to_string();
        strip(a) == strip(b)
    }
}

impl HostWindow for WinitWindow {
    fn id(&self) -> WindowId {
        host_window_id(self.window.id())
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    fn is_minimized(&self) -> bool {
        self.window.is_minimized().unwrap_or(false)
    }

    fn bounds(&self) -> Bounds {
        let position = self.window.outer_position().unwrap_or_default();
        let size = self.window.inner_size();
        Bounds {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn current_url(&self) -> String {
        self.history
            .get(self.position)
            .cloned()
            .unwrap_or_else(|| crate::descriptor::BLANK_PAGE_URL.to_string())
    }

    fn load_url(&mut self, url: &str) {
        let in_page = self
            .history
            .get(self.position)
            .is_some_and(|current| Self::same_page(current, url));
        if !self.history.is_empty() {
            self.history.truncate(self.position + 1);
        }
        self.history.push(url.to_string());
        self.position = self.history.len() - 1;
        self.navigated(in_page);
    }

    fn maximize(&mut self) {
        self.window.set_maximized(true);
    }

    fn show(&mut self) {
        self.window.set_visible(true);
    }

    fn restore(&mut self) {
        self.window.set_minimized(false);
    }

    fn focus(&mut self) {
        self.window.focus_window();
    }

    fn can_go_back(&self) -> bool {
        self.position > 0
    }

    fn go_back(&mut self) {
        if self.can_go_back() {
            self.position -= 1;
            self.navigated(false);
        }
    }

    fn can_go_forward(&self) -> bool {
        self.position + 1 < self.history.len()
    }

    fn go_forward(&mut self) {
        if self.can_go_forward() {
            self.position += 1;
            self.navigated(false);
        }
    }
}

/// [`WindowHost`] over the active event loop, valid for one event.
pub struct WinitHost<'a> {
    event_loop: &'a ActiveEventLoop,
    proxy: &'a EventLoopProxy<UserEvent>,
}

impl<'a> WinitHost<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop, proxy: &'a EventLoopProxy<UserEvent>) -> Self {
        Self { event_loop, proxy }
    }
}

impl WindowHost for WinitHost<'_> {
    fn create_window(&mut self, options: &WindowOptions) -> Result<Box<dyn HostWindow>, HostError> {
        let mut attributes = Window::default_attributes()
            .with_title(options.title.clone())
            .with_visible(options.visible);
        if let Some((width, height)) = options.size {
            attributes = attributes.with_inner_size(PhysicalSize::new(width, height));
        }
        if let Some((x, y)) = options.position {
            attributes = attributes.with_position(PhysicalPosition::new(x, y));
        }

        let window = self
            .event_loop
            .create_window(attributes)
            .map_err(|e| HostError::CreateWindow(e.to_string()))?;
        Ok(Box::new(WinitWindow::new(window, self.proxy.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_page_ignores_fragment() {
        assert!(WinitWindow::same_page(
            "https://cad.onshape.com/documents/1#tab",
            "https://cad.onshape.com/documents/1"
        ));
        assert!(!WinitWindow::same_page(
            "https://cad.onshape.com/documents/1",
            "https://cad.onshape.com/documents/2"
        ));
    }
}
