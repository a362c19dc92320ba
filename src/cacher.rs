//! Short-lived cache of just-closed windows backing "reopen last closed window".
//!
//! Every registered window gets a [`CachedWindowState`] holding its own copy of
//! the descriptor. Closing a window stamps `closed_at` and freezes the copy;
//! once the window has fully finished closing, the entry may be popped for
//! undo until [`CLOSED_WINDOW_TTL`] elapses. Expired entries are evicted
//! lazily by every query, there is no background timer.

use crate::clock::{Clock, SystemClock};
use crate::descriptor::{WindowDescriptor, snapshot_window_state};
use crate::host::{HostWindow, WindowId};
use chrono::{DateTime, Duration, Utc};

/// How long a closed window stays eligible for undo.
pub const CLOSED_WINDOW_TTL: Duration = Duration::milliseconds(1000);

/// Undo-cache entry for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedWindowState {
    /// Independent copy; never aliases the registry's descriptor
    pub descriptor: WindowDescriptor,
    pub window_id: WindowId,
    pub opened_at: DateTime<Utc>,
    /// Set when the window begins closing
    pub closed_at: Option<DateTime<Utc>>,
    /// Title at the last snapshot
    pub title: Option<String>,
    /// Non-owning reference to the live window, cleared once it has closed
    pub live_window: Option<WindowId>,
}

impl CachedWindowState {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Closed long enough ago that undo is no longer offered.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.closed_at
            .is_some_and(|closed_at| now - closed_at >= CLOSED_WINDOW_TTL)
    }

    fn update_from(&mut self, window: &dyn HostWindow) {
        snapshot_window_state(window, &mut self.descriptor);
        self.title = self.descriptor.title.clone();
    }
}

pub struct WindowStateCacher {
    cached_states: Vec<CachedWindowState>,
    last_closed: Option<WindowId>,
    clock: Box<dyn Clock>,
}

impl Default for WindowStateCacher {
    fn default() -> Self {
        Self::new(Box::new(SystemClock))
    }
}

impl WindowStateCacher {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            cached_states: Vec::new(),
            last_closed: None,
            clock,
        }
    }

    /// Start tracking a freshly created window.
    pub fn add_new_window(&mut self, window: &dyn HostWindow, descriptor: &WindowDescriptor) {
        let state = CachedWindowState {
            descriptor: descriptor.clone(),
            window_id: window.id(),
            opened_at: self.clock.now(),
            closed_at: None,
            title: descriptor.title.clone(),
            live_window: Some(window.id()),
        };
        log::debug!(
            "Caching window {} ({}) opened at {}",
            state.window_id,
            state.descriptor.url,
            state.opened_at
        );
        self.cached_states.push(state);
    }

    /// Mark `window` as closing. Call from the window's close event, while
    /// the handle is still valid.
    pub fn window_closing(&mut self, window: &dyn HostWindow, update_geometry: bool) {
        let window_id = window.id();
        let now = self.clock.now();
        let Some(state) = self
            .cached_states
            .iter_mut()
            .find(|state| state.window_id == window_id)
        else {
            log::warn!(
                "Attempted to close window {} that is not in the cache",
                window_id
            );
            return;
        };

        state.closed_at = Some(now);
        if update_geometry {
            state.update_from(window);
        }
        self.last_closed = Some(window_id);
        log::debug!("Window {} closing at {}", window_id, now);
    }

    /// Drop the live reference of a window that has finished closing. The
    /// entry itself stays until it expires or is popped.
    pub fn window_closed(&mut self, window_id: WindowId) {
        match self
            .cached_states
            .iter_mut()
            .find(|state| state.live_window == Some(window_id))
        {
            Some(state) => {
                state.live_window = None;
                log::debug!("Cleared live window reference for {}", window_id);
            }
            None => log::warn!(
                "Attempted to release window {} that is not in the cache",
                window_id
            ),
        }
    }

    /// Take the most recently closed window for undo.
    ///
    /// Returns `None` (leaving the cache untouched) unless that window has
    /// both started and finished closing and has not yet expired.
    pub fn pop_last_closed_window(&mut self) -> Option<CachedWindowState> {
        self.flush_expired_window_states();

        let Some(last_closed) = self.last_closed else {
            log::warn!("No last closed window state to pop");
            return None;
        };
        let Some(state) = self
            .cached_states
            .iter_mut()
            .find(|state| state.window_id == last_closed)
        else {
            log::warn!("Last closed window {} has already expired", last_closed);
            return None;
        };
        if state.closed_at.is_none() {
            log::warn!(
                "Last closed window {} has no close timestamp, cannot pop",
                last_closed
            );
            return None;
        }
        if state.live_window.is_some() {
            log::warn!(
                "Last closed window {} has not finished closing, cannot pop",
                last_closed
            );
            return None;
        }

        let popped = state.clone();
        // Epoch timestamp makes the next flush evict the entry
        state.closed_at = Some(DateTime::<Utc>::default());
        self.last_closed = None;
        self.flush_expired_window_states();
        log::info!(
            "Popped last closed window {} ({})",
            popped.window_id,
            popped.descriptor.url
        );
        Some(popped)
    }

    /// Withdraw every finished close from undo.
    ///
    /// Used when the shell itself closed or replaced the windows, so none of
    /// them is a user close that undo could restore.
    pub fn forget_closed_windows(&mut self) {
        let before = self.cached_states.len();
        self.cached_states
            .retain(|state| state.is_open() || state.live_window.is_some());
        self.last_closed = None;
        log::debug!(
            "Forgot {} closed window states",
            before - self.cached_states.len()
        );
    }

    /// Refresh the snapshot of every still-open cached window.
    pub fn update_cache(&mut self, windows: &[&dyn HostWindow]) {
        for &window in windows {
            let window_id = window.id();
            if let Some(state) = self
                .cached_states
                .iter_mut()
                .find(|state| state.live_window == Some(window_id) && state.is_open())
            {
                state.update_from(window);
            }
        }
    }

    pub fn get_window_states(&mut self) -> &[CachedWindowState] {
        self.flush_expired_window_states();
        &self.cached_states
    }

    pub fn get_open_windows(&mut self) -> Vec<&CachedWindowState> {
        self.flush_expired_window_states();
        self.cached_states
            .iter()
            .filter(|state| state.is_open())
            .collect()
    }

    pub fn get_non_expired_closed_windows(&mut self) -> Vec<&CachedWindowState> {
        self.flush_expired_window_states();
        let now = self.clock.now();
        self.cached_states
            .iter()
            .filter(|state| !state.is_open() && !state.is_expired(now))
            .collect()
    }

    pub fn opened_windows_count(&mut self) -> usize {
        self.get_open_windows().len()
    }

    pub fn non_expired_closed_windows_count(&mut self) -> usize {
        self.get_non_expired_closed_windows().len()
    }

    fn flush_expired_window_states(&mut self) {
        let now = self.clock.now();
        let before = self.cached_states.len();
        self.cached_states.retain(|state| !state.is_expired(now));
        let flushed = before - self.cached_states.len();
        if flushed > 0 {
            log::debug!(
                "Flushed {} expired window states ({} remaining)",
                flushed,
                self.cached_states.len()
            );
        }
    }
}
