//! Default values used as `#[serde(default = "crate::defaults::...")]`
//! attributes on `Config` fields.

/// Page loaded by new windows and substituted for invalid URLs.
pub const DEFAULT_URL: &str = "https://cad.onshape.com/";

/// Width of a freshly opened window, in physical pixels.
pub const DEFAULT_WINDOW_WIDTH: u32 = 1200;

/// Height of a freshly opened window, in physical pixels.
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;

pub fn default_url() -> String {
    DEFAULT_URL.to_string()
}

pub fn default_window_width() -> u32 {
    DEFAULT_WINDOW_WIDTH
}

pub fn default_window_height() -> u32 {
    DEFAULT_WINDOW_HEIGHT
}

pub fn loading_window_title() -> String {
    "Loading - Onshape Desktop".to_string()
}
