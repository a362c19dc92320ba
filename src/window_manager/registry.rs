//! Live windows and the descriptor backing each one.

use crate::descriptor::WindowDescriptor;
use crate::host::{HostWindow, WindowId};

/// One live window. The entry owns the native handle; dropping it destroys
/// the window.
pub struct RegistryEntry {
    pub window: Box<dyn HostWindow>,
    /// Mutable source of truth for this window's persisted state
    pub descriptor: WindowDescriptor,
    /// Set by the close event, checked when the closed event arrives
    pub closing: bool,
}

impl RegistryEntry {
    pub fn new(window: Box<dyn HostWindow>, descriptor: WindowDescriptor) -> Self {
        Self {
            window,
            descriptor,
            closing: false,
        }
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }
}

/// Registry of live windows, kept in creation order so the persisted layout
/// restores windows in the order they were opened.
#[derive(Default)]
pub struct WindowRegistry {
    entries: Vec<RegistryEntry>,
}

impl WindowRegistry {
    pub fn insert(&mut self, entry: RegistryEntry) {
        let window_id = entry.id();
        if self.contains(window_id) {
            log::warn!("Window {} registered twice, replacing entry", window_id);
            self.remove(window_id);
        }
        self.entries.push(entry);
    }

    /// Remove by identity. Returns `None` when no entry matches.
    pub fn remove(&mut self, window_id: WindowId) -> Option<RegistryEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id() == window_id)?;
        Some(self.entries.remove(index))
    }

    pub fn contains(&self, window_id: WindowId) -> bool {
        self.get(window_id).is_some()
    }

    pub fn get(&self, window_id: WindowId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.id() == window_id)
    }

    pub fn get_mut(&mut self, window_id: WindowId) -> Option<&mut RegistryEntry> {
        self.entries.iter_mut().find(|entry| entry.id() == window_id)
    }

    pub fn first_mut(&mut self) -> Option<&mut RegistryEntry> {
        self.entries.first_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegistryEntry> {
        self.entries.iter_mut()
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.entries.iter().map(RegistryEntry::id).collect()
    }

    /// Copies of every backing descriptor, in creation order
    pub fn descriptors(&self) -> Vec<WindowDescriptor> {
        self.entries
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
