//! Durable window descriptors and the geometry snapshot that keeps them current.
//!
//! A [`WindowDescriptor`] is what survives a restart: the page a window was
//! showing and where it sat on screen. The persisted JSON uses exactly the
//! field names below and omits every absent optional field.

use crate::host::HostWindow;
use serde::{Deserialize, Serialize};

/// Sentinel a window reports after a failed navigation.
pub const BLANK_PAGE_URL: &str = "about:blank";

/// The durable record of one window's URL and geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    /// Page shown by the window
    pub url: String,
    /// Last known title. Informational only, never used to restore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    /// When `Some(true)`, `width`, `height`, `x` and `y` are all `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximized: Option<bool>,
}

impl WindowDescriptor {
    /// Descriptor for `url` with an explicit size and no position.
    pub fn with_size(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            title: None,
            width: Some(width),
            height: Some(height),
            x: None,
            y: None,
            maximized: None,
        }
    }

    /// `(width, height)` when both are known.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    /// `(x, y)` when both are known.
    pub fn position(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized == Some(true)
    }

    fn clear_geometry(&mut self) {
        self.width = None;
        self.height = None;
        self.x = None;
        self.y = None;
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.width = Some(bounds.width);
        self.height = Some(bounds.height);
        self.x = Some(bounds.x);
        self.y = Some(bounds.y);
    }
}

/// Outer position and inner size of a live window, in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Returns `true` for URLs that must never be loaded or persisted:
/// missing, empty, or the blank-page sentinel.
pub fn is_url_invalid(url: Option<&str>) -> bool {
    match url {
        None => true,
        Some(url) => url.is_empty() || url == BLANK_PAGE_URL,
    }
}

/// Copy the live state of `window` into `descriptor`.
///
/// A maximized window loses its explicit bounds so that a restore lets the
/// platform maximize it again. The URL is only taken when valid, so a failed
/// navigation never replaces the last good page.
pub fn snapshot_window_state(window: &dyn HostWindow, descriptor: &mut WindowDescriptor) {
    let maximized = window.is_maximized();
    if maximized {
        descriptor.clear_geometry();
    } else {
        descriptor.set_bounds(window.bounds());
    }
    descriptor.maximized = Some(maximized);
    descriptor.title = Some(window.title());

    let url = window.current_url();
    if is_url_invalid(Some(&url)) {
        log::warn!(
            "Ignoring invalid URL {:?} while saving state for window {}",
            url,
            window.id()
        );
    } else {
        descriptor.url = url;
    }
    log::debug!("Saved state for window {}", window.id());
}
