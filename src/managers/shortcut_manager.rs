//! Shortcut Manager for FuzzyTabber.
//!
//! Binds overlay actions to key chords with conflict detection.
//! Chords are stored in a canonical `Ctrl+Alt+Shift+Meta+Key` form so that
//! `ctrl+down`, `Control+ArrowDown` and `Ctrl+Down` resolve alike.

use std::collections::HashMap;

use crate::overlay::OverlayAction;
use crate::types::errors::ShortcutError;
use crate::types::settings::TabberSettings;

/// Trait defining shortcut management operations.
pub trait ShortcutManagerTrait {
    fn register_shortcut(&mut self, action: &str, keys: &str) -> Result<(), ShortcutError>;
    fn unregister_shortcut(&mut self, action: &str) -> Result<(), ShortcutError>;
    fn get_shortcut(&self, action: &str) -> Option<&str>;
    fn list_shortcuts(&self) -> &HashMap<String, String>;
    fn reset_to_defaults(&mut self) -> Result<(), ShortcutError>;
    fn has_conflict(&self, keys: &str, exclude_action: Option<&str>) -> Option<String>;
    fn get_default_shortcuts(&self) -> HashMap<String, String>;
    fn resolve(&self, keys: &str) -> Option<OverlayAction>;
}

/// Key bindings for the overlay, action name -> canonical chord.
pub struct ShortcutManager {
    shortcuts: HashMap<String, String>,
}

const MODIFIER_ORDER: [&str; 4] = ["Ctrl", "Alt", "Shift", "Meta"];

fn canonical_modifier(part: &str) -> Option<&'static str> {
    match part.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some("Ctrl"),
        "alt" | "option" => Some("Alt"),
        "shift" => Some("Shift"),
        "meta" | "cmd" | "command" | "super" => Some("Meta"),
        _ => None,
    }
}

fn canonical_key(part: &str) -> String {
    match part.to_ascii_lowercase().as_str() {
        "up" | "arrowup" => "Up".to_string(),
        "down" | "arrowdown" => "Down".to_string(),
        "left" | "arrowleft" => "Left".to_string(),
        "right" | "arrowright" => "Right".to_string(),
        "enter" | "return" => "Enter".to_string(),
        "esc" | "escape" => "Escape".to_string(),
        "space" | " " => "Space".to_string(),
        "tab" => "Tab".to_string(),
        lower => {
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Parses a chord such as `ctrl+down` into `Ctrl+Down`.
///
/// Exactly one non-modifier key is required.
pub fn normalize_keys(keys: &str) -> Result<String, ShortcutError> {
    let mut modifiers: Vec<&'static str> = Vec::new();
    let mut key: Option<String> = None;

    for part in keys.split('+').map(str::trim) {
        if part.is_empty() {
            return Err(ShortcutError::InvalidKeys(keys.to_string()));
        }
        if let Some(modifier) = canonical_modifier(part) {
            if !modifiers.contains(&modifier) {
                modifiers.push(modifier);
            }
        } else if key.is_some() {
            return Err(ShortcutError::InvalidKeys(keys.to_string()));
        } else {
            key = Some(canonical_key(part));
        }
    }

    let key = key.ok_or_else(|| ShortcutError::InvalidKeys(keys.to_string()))?;
    let mut parts: Vec<String> = MODIFIER_ORDER
        .iter()
        .filter(|m| modifiers.contains(m))
        .map(|m| m.to_string())
        .collect();
    parts.push(key);
    Ok(parts.join("+"))
}

impl ShortcutManager {
    pub fn new() -> Self {
        let mut mgr = Self {
            shortcuts: HashMap::new(),
        };
        mgr.shortcuts = mgr.get_default_shortcuts();
        mgr
    }

    /// Builds a manager from configured bindings, replacing the defaults.
    pub fn from_bindings(bindings: &HashMap<String, String>) -> Result<Self, ShortcutError> {
        let mut mgr = Self {
            shortcuts: HashMap::new(),
        };
        let mut actions: Vec<&String> = bindings.keys().collect();
        actions.sort();
        for action in actions {
            mgr.register_shortcut(action, &bindings[action])?;
        }
        Ok(mgr)
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutManagerTrait for ShortcutManager {
    fn register_shortcut(&mut self, action: &str, keys: &str) -> Result<(), ShortcutError> {
        if OverlayAction::from_name(action).is_none() {
            return Err(ShortcutError::UnknownAction(action.to_string()));
        }
        if keys.trim().is_empty() {
            return Err(ShortcutError::InvalidKeys("Keys cannot be empty".to_string()));
        }

        let normalized = normalize_keys(keys)?;
        if let Some(conflicting_action) = self.has_conflict(&normalized, Some(action)) {
            return Err(ShortcutError::Conflict(format!(
                "'{}' is already bound to '{}'",
                normalized, conflicting_action
            )));
        }

        self.shortcuts.insert(action.to_string(), normalized);
        Ok(())
    }

    fn unregister_shortcut(&mut self, action: &str) -> Result<(), ShortcutError> {
        self.shortcuts
            .remove(action)
            .map(|_| ())
            .ok_or_else(|| ShortcutError::NotFound(action.to_string()))
    }

    fn get_shortcut(&self, action: &str) -> Option<&str> {
        self.shortcuts.get(action).map(|s| s.as_str())
    }

    fn list_shortcuts(&self) -> &HashMap<String, String> {
        &self.shortcuts
    }

    fn reset_to_defaults(&mut self) -> Result<(), ShortcutError> {
        self.shortcuts = self.get_default_shortcuts();
        Ok(())
    }

    fn has_conflict(&self, keys: &str, exclude_action: Option<&str>) -> Option<String> {
        let normalized = normalize_keys(keys).ok()?;
        self.shortcuts
            .iter()
            .filter(|(action, _)| Some(action.as_str()) != exclude_action)
            .find(|(_, bound)| **bound == normalized)
            .map(|(action, _)| action.clone())
    }

    fn get_default_shortcuts(&self) -> HashMap<String, String> {
        TabberSettings::default_shortcuts()
            .into_iter()
            .filter_map(|(action, keys)| normalize_keys(&keys).ok().map(|k| (action, k)))
            .collect()
    }

    fn resolve(&self, keys: &str) -> Option<OverlayAction> {
        let normalized = normalize_keys(keys).ok()?;
        self.shortcuts
            .iter()
            .find(|(_, bound)| **bound == normalized)
            .and_then(|(action, _)| OverlayAction::from_name(action))
    }
}
