use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TabberSettings {
    pub overlay: OverlaySettings,
    pub search: SearchSettings,
    pub bridge: BridgeSettings,
    pub shortcuts: HashMap<String, String>,
    pub logging: LoggingSettings,
}

impl Default for TabberSettings {
    fn default() -> Self {
        Self {
            overlay: OverlaySettings::default(),
            search: SearchSettings::default(),
            bridge: BridgeSettings::default(),
            shortcuts: Self::default_shortcuts(),
            logging: LoggingSettings::default(),
        }
    }
}

impl TabberSettings {
    /// Returns the default overlay key bindings, keyed by action name.
    pub fn default_shortcuts() -> HashMap<String, String> {
        let mut shortcuts = HashMap::new();
        shortcuts.insert("navigate_up".to_string(), "Up".to_string());
        shortcuts.insert("navigate_down".to_string(), "Down".to_string());
        shortcuts.insert("select".to_string(), "Enter".to_string());
        shortcuts.insert("select_to_window".to_string(), "Shift+Enter".to_string());
        shortcuts.insert("close_selected".to_string(), "Ctrl+Down".to_string());
        shortcuts.insert("bring_to_window".to_string(), "Ctrl+Left".to_string());
        shortcuts.insert("dismiss".to_string(), "Escape".to_string());
        shortcuts
    }
}

/// How the overlay leaves the page when it exits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Mounted into the page on show, unmounted on exit.
    Injected,
    /// Stays mounted; exit hides the container and clears the input.
    Toggle,
}

/// What committing a row without a tab identifier does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionGuard {
    /// Rows without an identifier are inert: no call, overlay stays open.
    RequireIdentifier,
    /// No call is made but the overlay still exits.
    CloseWithoutCall,
    /// Enter exits without a call; a click on the row is inert.
    CloseOnEnter,
}

/// When the bridge refreshes its tab snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Re-query on tab lifecycle events; reads are served from the cache.
    Push,
    /// Query the host fresh on every read.
    Pull,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlaySettings {
    pub presentation_mode: PresentationMode,
    pub selection_guard: SelectionGuard,
    /// Pixels between the viewport top and a keyboard-selected row.
    pub scroll_offset: f64,
    pub smooth_scroll: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            presentation_mode: PresentationMode::Injected,
            selection_guard: SelectionGuard::RequireIdentifier,
            scroll_offset: -64.0,
            smooth_scroll: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    pub ignore_case: bool,
    /// Score tabs against their URL as well as their title.
    pub match_urls: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            ignore_case: true,
            match_urls: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeSettings {
    pub refresh_policy: RefreshPolicy,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            refresh_policy: RefreshPolicy::Push,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
