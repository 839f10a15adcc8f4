//! Host tab-management surface.
//!
//! `TabHost` is the capability set the bridge is allowed to use: enumerate
//! tabs, activate/move/close them, and read windows and tab groups.
//! `MemoryHost` implements it over an in-memory browser model and reports
//! lifecycle changes as `HostEvent`s.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use crate::types::errors::HostError;
use crate::types::tab::{MoveIndex, Tab, TabGroup, TabUpdate, Window, WindowUpdate};

/// Trait defining the host primitives the command bridge consumes.
pub trait TabHost {
    fn query_tabs(&self) -> Result<Vec<Tab>, HostError>;
    fn get_tab(&self, tab_id: i64) -> Result<Tab, HostError>;
    fn update_tab(&self, tab_id: i64, update: TabUpdate) -> Result<(), HostError>;
    fn move_tab(&self, tab_id: i64, window_id: i64, index: MoveIndex) -> Result<(), HostError>;
    fn current_window(&self) -> Result<Window, HostError>;
    fn get_window(&self, window_id: i64) -> Result<Window, HostError>;
    fn update_window(&self, window_id: i64, update: WindowUpdate) -> Result<(), HostError>;
    fn query_tab_groups(&self) -> Result<Vec<TabGroup>, HostError>;
    fn remove_tab(&self, tab_id: i64) -> Result<(), HostError>;
}

/// Tab lifecycle notifications emitted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Created { tab_id: Option<i64> },
    Removed { tab_id: i64 },
    Attached { tab_id: i64, window_id: i64 },
    Detached { tab_id: i64, window_id: i64 },
    Updated { tab_id: i64 },
    Moved { tab_id: i64 },
    Activated { tab_id: i64 },
}

impl HostEvent {
    /// Whether the event invalidates a cached tab snapshot.
    pub fn triggers_refresh(&self) -> bool {
        matches!(
            self,
            HostEvent::Created { .. }
                | HostEvent::Removed { .. }
                | HostEvent::Attached { .. }
                | HostEvent::Updated { .. }
        )
    }
}

struct HostState {
    windows: Vec<Window>,
    tabs: Vec<Tab>,
    groups: Vec<TabGroup>,
    focused_window: Option<i64>,
    next_tab_id: i64,
    next_window_id: i64,
    pending_events: Vec<HostEvent>,
    sink: Option<mpsc::UnboundedSender<HostEvent>>,
}

impl HostState {
    fn emit(&mut self, event: HostEvent) {
        if let Some(sink) = &self.sink {
            if sink.send(event).is_ok() {
                return;
            }
            self.sink = None;
        }
        self.pending_events.push(event);
    }

    fn window_position(&self, window_id: i64) -> Option<usize> {
        self.windows.iter().position(|w| w.id == window_id)
    }

    fn tab_position(&self, tab_id: i64) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == Some(tab_id))
    }

    fn ensure_window(&mut self, window_id: i64) {
        if self.window_position(window_id).is_none() {
            self.windows.push(Window {
                id: window_id,
                focused: false,
            });
            if window_id >= self.next_window_id {
                self.next_window_id = window_id + 1;
            }
        }
        if self.focused_window.is_none() {
            self.set_focus(window_id);
        }
    }

    fn set_focus(&mut self, window_id: i64) {
        self.focused_window = Some(window_id);
        for window in &mut self.windows {
            window.focused = window.id == window_id;
        }
    }

    /// Renumber `index` of every tab in the window by vector order.
    fn reindex(&mut self, window_id: i64) {
        let mut next = 0;
        for tab in self.tabs.iter_mut().filter(|t| t.window_id == window_id) {
            tab.index = next;
            next += 1;
        }
    }

    fn tabs_in_window(&self, window_id: i64) -> usize {
        self.tabs.iter().filter(|t| t.window_id == window_id).count()
    }
}

/// In-memory browser model implementing `TabHost`.
///
/// Cloning shares the underlying state, so a test or binary can keep a
/// handle while the bridge owns another.
#[derive(Clone)]
pub struct MemoryHost {
    state: Arc<Mutex<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                windows: Vec::new(),
                tabs: Vec::new(),
                groups: Vec::new(),
                focused_window: None,
                next_tab_id: 1,
                next_window_id: 1,
                pending_events: Vec::new(),
                sink: None,
            })),
        }
    }

    /// Builds a host pre-populated with `tabs`, without emitting events.
    pub fn from_tabs(tabs: Vec<Tab>) -> Self {
        let host = Self::new();
        if let Ok(mut state) = host.state.lock() {
            for tab in tabs {
                state.ensure_window(tab.window_id);
                if let Some(id) = tab.id {
                    state.next_tab_id = state.next_tab_id.max(id + 1);
                }
                state.tabs.push(tab);
            }
            let window_ids: Vec<i64> = state.windows.iter().map(|w| w.id).collect();
            for window_id in window_ids {
                state.reindex(window_id);
            }
        }
        host
    }

    fn lock(&self) -> Result<MutexGuard<'_, HostState>, HostError> {
        self.state
            .lock()
            .map_err(|e| HostError::Unavailable(e.to_string()))
    }

    /// Opens a new empty window and returns its ID.
    /// The first window opened becomes the focused one.
    pub fn open_window(&self) -> Result<i64, HostError> {
        let mut state = self.lock()?;
        let id = state.next_window_id;
        state.ensure_window(id);
        Ok(id)
    }

    /// Appends a new tab to the window and returns the tab's ID.
    pub fn create_tab(&self, window_id: i64, title: &str, url: &str) -> Result<i64, HostError> {
        let mut state = self.lock()?;
        if state.window_position(window_id).is_none() {
            return Err(HostError::WindowNotFound(window_id));
        }
        let id = state.next_tab_id;
        state.next_tab_id += 1;
        let mut tab = Tab::new(id, window_id, title, url);
        tab.index = state.tabs_in_window(window_id);
        state.tabs.push(tab);
        state.emit(HostEvent::Created { tab_id: Some(id) });
        Ok(id)
    }

    /// Inserts a tab as-is, e.g. a privileged tab without an ID.
    pub fn insert_tab(&self, tab: Tab) -> Result<(), HostError> {
        let mut state = self.lock()?;
        state.ensure_window(tab.window_id);
        if let Some(id) = tab.id {
            if state.tab_position(id).is_some() {
                return Err(HostError::Unavailable(format!("duplicate tab id {}", id)));
            }
            state.next_tab_id = state.next_tab_id.max(id + 1);
        }
        let window_id = tab.window_id;
        let tab_id = tab.id;
        state.tabs.push(tab);
        state.reindex(window_id);
        state.emit(HostEvent::Created { tab_id });
        Ok(())
    }

    pub fn add_group(&self, group: TabGroup) -> Result<(), HostError> {
        let mut state = self.lock()?;
        state.groups.retain(|g| g.id != group.id);
        state.groups.push(group);
        Ok(())
    }

    pub fn set_tab_group(&self, tab_id: i64, group_id: Option<i64>) -> Result<(), HostError> {
        let mut state = self.lock()?;
        let pos = state
            .tab_position(tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        state.tabs[pos].group_id = group_id;
        state.emit(HostEvent::Updated { tab_id });
        Ok(())
    }

    pub fn set_tab_title(&self, tab_id: i64, title: &str) -> Result<(), HostError> {
        let mut state = self.lock()?;
        let pos = state
            .tab_position(tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        state.tabs[pos].title = Some(title.to_string());
        state.emit(HostEvent::Updated { tab_id });
        Ok(())
    }

    pub fn tab_count(&self) -> usize {
        self.state.lock().map(|s| s.tabs.len()).unwrap_or(0)
    }

    /// Drains events emitted while no subscriber was attached.
    pub fn take_events(&self) -> Vec<HostEvent> {
        self.state
            .lock()
            .map(|mut s| std::mem::take(&mut s.pending_events))
            .unwrap_or_default()
    }

    /// Routes future events into a channel. Pending events are flushed
    /// into it first.
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<HostEvent>, HostError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock()?;
        for event in std::mem::take(&mut state.pending_events) {
            let _ = tx.send(event);
        }
        state.sink = Some(tx);
        Ok(rx)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TabHost for MemoryHost {
    /// All tabs, grouped by window in window-open order, then by index.
    fn query_tabs(&self) -> Result<Vec<Tab>, HostError> {
        let state = self.lock()?;
        let mut tabs = state.tabs.clone();
        tabs.sort_by_key(|t| (state.window_position(t.window_id), t.index));
        Ok(tabs)
    }

    fn get_tab(&self, tab_id: i64) -> Result<Tab, HostError> {
        let state = self.lock()?;
        state
            .tabs
            .iter()
            .find(|t| t.id == Some(tab_id))
            .cloned()
            .ok_or(HostError::TabNotFound(tab_id))
    }

    fn update_tab(&self, tab_id: i64, update: TabUpdate) -> Result<(), HostError> {
        let mut state = self.lock()?;
        let pos = state
            .tab_position(tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        let window_id = state.tabs[pos].window_id;

        if update.active == Some(true) && !state.tabs[pos].active {
            for tab in state.tabs.iter_mut().filter(|t| t.window_id == window_id) {
                tab.active = false;
            }
            state.tabs[pos].active = true;
            state.emit(HostEvent::Activated { tab_id });
        } else if update.active == Some(false) {
            state.tabs[pos].active = false;
        }
        if let Some(highlighted) = update.highlighted {
            state.tabs[pos].highlighted = highlighted;
        }

        state.emit(HostEvent::Updated { tab_id });
        Ok(())
    }

    fn move_tab(&self, tab_id: i64, window_id: i64, index: MoveIndex) -> Result<(), HostError> {
        let mut state = self.lock()?;
        if state.window_position(window_id).is_none() {
            return Err(HostError::WindowNotFound(window_id));
        }
        let pos = state
            .tab_position(tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;

        let mut tab = state.tabs.remove(pos);
        let source_window = tab.window_id;
        tab.window_id = window_id;
        if source_window != window_id {
            // A tab leaving its window gives up activation there.
            tab.active = false;
        }

        let target_slots: Vec<usize> = state
            .tabs
            .iter()
            .enumerate()
            .filter(|(_, t)| t.window_id == window_id)
            .map(|(i, _)| i)
            .collect();
        let insert_at = match index {
            MoveIndex::At(n) if n < target_slots.len() => target_slots[n],
            _ => target_slots
                .last()
                .map(|&i| i + 1)
                .unwrap_or(state.tabs.len()),
        };
        state.tabs.insert(insert_at, tab);

        state.reindex(source_window);
        state.reindex(window_id);

        if source_window != window_id {
            state.emit(HostEvent::Detached {
                tab_id,
                window_id: source_window,
            });
            state.emit(HostEvent::Attached { tab_id, window_id });
        } else {
            state.emit(HostEvent::Moved { tab_id });
        }
        Ok(())
    }

    fn current_window(&self) -> Result<Window, HostError> {
        let state = self.lock()?;
        let id = state
            .focused_window
            .or_else(|| state.windows.first().map(|w| w.id))
            .ok_or(HostError::NoWindow)?;
        state
            .windows
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(HostError::WindowNotFound(id))
    }

    fn get_window(&self, window_id: i64) -> Result<Window, HostError> {
        let state = self.lock()?;
        state
            .windows
            .iter()
            .find(|w| w.id == window_id)
            .cloned()
            .ok_or(HostError::WindowNotFound(window_id))
    }

    fn update_window(&self, window_id: i64, update: WindowUpdate) -> Result<(), HostError> {
        let mut state = self.lock()?;
        if state.window_position(window_id).is_none() {
            return Err(HostError::WindowNotFound(window_id));
        }
        if update.focused == Some(true) {
            state.set_focus(window_id);
        }
        Ok(())
    }

    fn query_tab_groups(&self) -> Result<Vec<TabGroup>, HostError> {
        Ok(self.lock()?.groups.clone())
    }

    /// Removes the tab. If it was active, its nearest neighbor in the same
    /// window becomes active.
    fn remove_tab(&self, tab_id: i64) -> Result<(), HostError> {
        let mut state = self.lock()?;
        let pos = state
            .tab_position(tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        let removed = state.tabs.remove(pos);
        state.reindex(removed.window_id);

        if removed.active {
            let remaining = state.tabs_in_window(removed.window_id);
            if remaining > 0 {
                let neighbor = removed.index.min(remaining - 1);
                if let Some(tab) = state
                    .tabs
                    .iter_mut()
                    .find(|t| t.window_id == removed.window_id && t.index == neighbor)
                {
                    tab.active = true;
                }
            }
        }

        state.emit(HostEvent::Removed { tab_id });
        Ok(())
    }
}
