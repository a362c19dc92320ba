//! Shared integration test helpers for webdesk.
//!
//! Provides a mock window host whose windows can be inspected and mutated
//! after the window manager has taken ownership of them, a shared in-memory
//! store that counts writes, and `TestShell`, which wires both into a
//! `WindowManager` driven by a manual clock.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::TestShell;
//! ```
//!
//! The `#![allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use webdesk::clock::ManualClock;
use webdesk::config::{AllWindowsClosedAction, Config};
use webdesk::descriptor::{BLANK_PAGE_URL, Bounds, WindowDescriptor};
use webdesk::host::{HostError, HostWindow, WindowHost, WindowId, WindowOptions};
use webdesk::state_manager::{DescriptorDefaults, StateManager, WINDOW_STORAGE_KEY};
use webdesk::store::{PersistentStore, StoreError};
use webdesk::window_manager::WindowManager;

/// Observable state of one mock window
#[derive(Debug, Clone)]
pub struct MockWindowState {
    pub id: WindowId,
    pub title: String,
    pub bounds: Bounds,
    pub maximized: bool,
    pub minimized: bool,
    pub visible: bool,
    pub focused: bool,
    pub maximize_calls: usize,
    pub history: Vec<String>,
    pub position: usize,
}

impl MockWindowState {
    pub fn current_url(&self) -> String {
        self.history
            .get(self.position)
            .cloned()
            .unwrap_or_else(|| BLANK_PAGE_URL.to_string())
    }

    /// Simulate the page itself navigating (e.g. a link click).
    pub fn navigate(&mut self, url: &str) {
        self.history.truncate(self.position + 1);
        self.history.push(url.to_string());
        self.position = self.history.len() - 1;
    }
}

pub type MockHandle = Rc<RefCell<MockWindowState>>;

pub struct MockWindow {
    state: MockHandle,
}

impl HostWindow for MockWindow {
    fn id(&self) -> WindowId {
        self.state.borrow().id
    }

    fn is_maximized(&self) -> bool {
        self.state.borrow().maximized
    }

    fn is_minimized(&self) -> bool {
        self.state.borrow().minimized
    }

    fn bounds(&self) -> Bounds {
        self.state.borrow().bounds
    }

    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn current_url(&self) -> String {
        self.state.borrow().current_url()
    }

    fn load_url(&mut self, url: &str) {
        self.state.borrow_mut().navigate(url);
    }

    fn maximize(&mut self) {
        let mut state = self.state.borrow_mut();
        state.maximized = true;
        state.maximize_calls += 1;
    }

    fn show(&mut self) {
        self.state.borrow_mut().visible = true;
    }

    fn restore(&mut self) {
        self.state.borrow_mut().minimized = false;
    }

    fn focus(&mut self) {
        self.state.borrow_mut().focused = true;
    }

    fn can_go_back(&self) -> bool {
        self.state.borrow().position > 0
    }

    fn go_back(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.position > 0 {
            state.position -= 1;
        }
    }

    fn can_go_forward(&self) -> bool {
        let state = self.state.borrow();
        state.position + 1 < state.history.len()
    }

    fn go_forward(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.position + 1 < state.history.len() {
            state.position += 1;
        }
    }
}

/// Window host that records every creation request
#[derive(Default)]
pub struct MockHost {
    next_id: u64,
    pub windows: Vec<MockHandle>,
    pub created_options: Vec<WindowOptions>,
    /// Number of upcoming creation requests to refuse
    pub failures_pending: usize,
}

impl MockHost {
    pub fn handle(&self, id: WindowId) -> MockHandle {
        self.windows
            .iter()
            .find(|window| window.borrow().id == id)
            .cloned()
            .unwrap_or_else(|| panic!("no mock window {id}"))
    }
}

impl WindowHost for MockHost {
    fn create_window(&mut self, options: &WindowOptions) -> Result<Box<dyn HostWindow>, HostError> {
        self.created_options.push(options.clone());
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(HostError::CreateWindow("mock failure".to_string()));
        }

        self.next_id += 1;
        let (width, height) = options.size.unwrap_or((800, 600));
        let (x, y) = options.position.unwrap_or((100, 100));
        let state = Rc::new(RefCell::new(MockWindowState {
            id: WindowId(self.next_id),
            title: options.title.clone(),
            bounds: Bounds {
                x,
                y,
                width,
                height,
            },
            maximized: false,
            minimized: false,
            visible: options.visible,
            focused: false,
            maximize_calls: 0,
            history: Vec::new(),
            position: 0,
        }));
        self.windows.push(Rc::clone(&state));
        Ok(Box::new(MockWindow { state }))
    }
}

/// In-memory store whose contents and write count stay visible to the test
#[derive(Clone, Default)]
pub struct SharedStore {
    values: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
}

impl SharedStore {
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl PersistentStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes.set(self.writes.get() + 1);
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Config that quits when the last window closes, on every platform
pub fn quitting_config() -> Config {
    Config {
        all_windows_closed: AllWindowsClosedAction::Quit,
        ..Config::default()
    }
}

/// A window manager wired to a mock host, a shared store and a manual clock
pub struct TestShell {
    pub manager: WindowManager,
    pub host: MockHost,
    pub store: SharedStore,
    pub clock: ManualClock,
}

impl TestShell {
    pub fn new() -> Self {
        Self::with(quitting_config(), None)
    }

    pub fn with_saved(json: &str) -> Self {
        Self::with(quitting_config(), Some(json))
    }

    pub fn with(config: Config, saved: Option<&str>) -> Self {
        let store = SharedStore::default();
        if let Some(json) = saved {
            store
                .values
                .borrow_mut()
                .insert(WINDOW_STORAGE_KEY.to_string(), json.to_string());
        }
        let clock = ManualClock::default();
        let state_manager = StateManager::new(
            Box::new(store.clone()),
            DescriptorDefaults::from_config(&config),
        );
        let manager = WindowManager::with_clock(config, state_manager, Box::new(clock.clone()));
        Self {
            manager,
            host: MockHost::default(),
            store,
            clock,
        }
    }

    pub fn open(&mut self) {
        self.manager.open_windows(&mut self.host);
    }

    pub fn close(&mut self, id: WindowId) {
        self.manager.close_window(&mut self.host, id);
    }

    pub fn window(&self, id: WindowId) -> MockHandle {
        self.host.handle(id)
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.manager.window_ids()
    }

    /// Descriptors currently persisted under the window-state key
    pub fn persisted(&self) -> Vec<WindowDescriptor> {
        let json = self
            .store
            .value(WINDOW_STORAGE_KEY)
            .expect("no persisted window state");
        serde_json::from_str(&json).expect("persisted window state is not valid JSON")
    }
}

pub fn descriptor(url: &str) -> WindowDescriptor {
    WindowDescriptor {
        url: url.to_string(),
        title: None,
        width: None,
        height: None,
        x: None,
        y: None,
        maximized: None,
    }
}
