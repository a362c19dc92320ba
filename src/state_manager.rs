//! Restart-durable list of window descriptors.
//!
//! Mutating the in-memory list and persisting it are separate steps so the
//! window manager can fold several window updates (e.g. a whole shutdown)
//! into a single write. The only self-persisting operation is
//! [`StateManager::reset_saved_windows_state`].

use crate::config::Config;
use crate::descriptor::WindowDescriptor;
use crate::store::PersistentStore;

/// Key under which the serialized descriptor list is stored.
pub const WINDOW_STORAGE_KEY: &str = "windowsState";

/// Page and size given to windows that have no saved state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorDefaults {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl DescriptorDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.default_url.clone(),
            width: config.default_window_width,
            height: config.default_window_height,
        }
    }

    /// Descriptor for `url` (or the default page) at the default size.
    pub fn descriptor(&self, url: Option<&str>) -> WindowDescriptor {
        WindowDescriptor::with_size(url.unwrap_or(&self.url), self.width, self.height)
    }
}

impl Default for DescriptorDefaults {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Owns the canonical descriptor list and its serialized copy in the store.
pub struct StateManager {
    store: Box<dyn PersistentStore>,
    defaults: DescriptorDefaults,
    window_descriptors: Vec<WindowDescriptor>,
}

impl StateManager {
    pub fn new(store: Box<dyn PersistentStore>, defaults: DescriptorDefaults) -> Self {
        let window_descriptors = vec![defaults.descriptor(None)];
        Self {
            store,
            defaults,
            window_descriptors,
        }
    }

    pub fn defaults(&self) -> &DescriptorDefaults {
        &self.defaults
    }

    pub fn default_descriptor(&self) -> WindowDescriptor {
        self.defaults.descriptor(None)
    }

    /// The single-window list used whenever nothing usable is saved.
    pub fn default_windows(&self) -> Vec<WindowDescriptor> {
        vec![self.default_descriptor()]
    }

    /// Current in-memory list, without touching the store.
    pub fn descriptors(&self) -> &[WindowDescriptor] {
        &self.window_descriptors
    }

    /// Load the saved descriptor list and adopt it as the in-memory state.
    ///
    /// Missing, unreadable or malformed data falls back to the default list;
    /// failures are logged and never returned.
    pub fn get_windows(&mut self) -> Vec<WindowDescriptor> {
        let serialized = match self.store.get(WINDOW_STORAGE_KEY) {
            Ok(serialized) => serialized,
            Err(e) => {
                log::error!("Failed to read saved windows state: {}", e);
                None
            }
        };
        log::debug!("Got windows state: {:?}", serialized);

        let Some(serialized) = serialized else {
            log::info!("No windows state found, using default");
            self.window_descriptors = self.default_windows();
            return self.window_descriptors.clone();
        };

        match serde_json::from_str::<Vec<WindowDescriptor>>(&serialized) {
            Ok(descriptors) => {
                log::info!("Loaded windows state ({} windows)", descriptors.len());
                self.window_descriptors = descriptors;
            }
            Err(e) => {
                log::error!("Malformed windows state, using default: {}", e);
                self.window_descriptors = self.default_windows();
            }
        }
        self.window_descriptors.clone()
    }

    /// Write the full in-memory list to the store. Failures are logged.
    pub fn save(&mut self, reason: &str) {
        let serialized = match serde_json::to_string(&self.window_descriptors) {
            Ok(serialized) => serialized,
            Err(e) => {
                log::error!("Error serializing windows state ({}): {}", reason, e);
                return;
            }
        };

        match self.store.set(WINDOW_STORAGE_KEY, &serialized) {
            Ok(()) => log::info!(
                "Saved windows state ({}, {} windows): {}",
                reason,
                self.window_descriptors.len(),
                serialized
            ),
            Err(e) => log::error!("Error saving windows state ({}): {}", reason, e),
        }
    }

    /// Replace the in-memory list. Does not persist; call [`Self::save`].
    ///
    /// An empty list is ignored with a warning; use
    /// [`Self::clear_window_descriptors_state`] to empty the state.
    pub fn set_window_descriptors_state(&mut self, descriptors: Vec<WindowDescriptor>) {
        if descriptors.is_empty() {
            log::warn!(
                "Attempted to overwrite window descriptors state with an empty list. No changes made."
            );
            return;
        }
        log::debug!(
            "Overwriting window descriptors state ({} windows)",
            descriptors.len()
        );
        self.window_descriptors = descriptors;
    }

    /// Empty the in-memory list. Does not persist.
    pub fn clear_window_descriptors_state(&mut self) {
        log::info!("Clearing window descriptors state");
        self.window_descriptors.clear();
    }

    /// Forget the saved layout and persist the single default window.
    pub fn reset_saved_windows_state(&mut self) {
        log::info!("Resetting windows state to default");
        if let Err(e) = self.store.delete(WINDOW_STORAGE_KEY) {
            log::error!("Failed to delete saved windows state: {}", e);
        }
        self.window_descriptors = self.default_windows();
        self.save("reset saved windows state");
    }

    /// Raw persisted value, for diagnostics.
    pub fn windows_json(&self) -> Option<String> {
        match self.store.get(WINDOW_STORAGE_KEY) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to read saved windows state: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager_with(value: Option<&str>) -> StateManager {
        let mut store = MemoryStore::new();
        if let Some(value) = value {
            store.set(WINDOW_STORAGE_KEY, value).unwrap();
        }
        StateManager::new(Box::new(store), DescriptorDefaults::default())
    }

    fn sample_windows() -> Vec<WindowDescriptor> {
        vec![
            WindowDescriptor {
                url: "https://cad.onshape.com/documents/1".to_string(),
                title: Some("Part Studio 1".to_string()),
                width: Some(900),
                height: Some(700),
                x: Some(40),
                y: Some(60),
                maximized: Some(false),
            },
            WindowDescriptor {
                url: "https://cad.onshape.com/documents/2".to_string(),
                title: None,
                width: None,
                height: None,
                x: None,
                y: None,
                maximized: Some(true),
            },
        ]
    }

    #[test]
    fn test_missing_state_returns_default() {
        let mut manager = manager_with(None);
        let windows = manager.get_windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].url, "https://cad.onshape.com/");
        assert_eq!(windows[0].size(), Some((1200, 800)));
        assert_eq!(manager.descriptors(), windows.as_slice());
    }

    #[test]
    fn test_malformed_state_returns_default() {
        let mut manager = manager_with(Some("{not json"));
        let windows = manager.get_windows();
        assert_eq!(windows, manager.default_windows());
    }

    #[test]
    fn test_empty_saved_list_is_returned_as_is() {
        let mut manager = manager_with(Some("[]"));
        assert!(manager.get_windows().is_empty());
    }

    #[test]
    fn test_save_then_get_roundtrip() {
        let mut manager = manager_with(None);
        manager.set_window_descriptors_state(sample_windows());
        manager.save("test");

        manager.clear_window_descriptors_state();
        assert!(manager.descriptors().is_empty());

        assert_eq!(manager.get_windows(), sample_windows());
    }

    #[test]
    fn test_empty_overwrite_is_ignored() {
        let mut manager = manager_with(None);
        manager.set_window_descriptors_state(sample_windows());
        manager.set_window_descriptors_state(Vec::new());
        assert_eq!(manager.descriptors(), sample_windows().as_slice());
    }

    #[test]
    fn test_set_does_not_persist() {
        let mut manager = manager_with(None);
        manager.set_window_descriptors_state(sample_windows());
        assert_eq!(manager.windows_json(), None);
    }

    #[test]
    fn test_reset_persists_default() {
        let mut manager = manager_with(None);
        manager.set_window_descriptors_state(sample_windows());
        manager.save("before reset");

        manager.reset_saved_windows_state();
        assert_eq!(manager.descriptors(), manager.default_windows().as_slice());
        assert_eq!(manager.get_windows(), manager.default_windows());

        manager.reset_saved_windows_state();
        assert_eq!(manager.get_windows(), manager.default_windows());
    }
}
