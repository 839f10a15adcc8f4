// FuzzyTabber Settings Engine
// Manages user settings: loading, saving, updating individual values, and resetting to defaults.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::Path;

use crate::managers::shortcut_manager::ShortcutManager;
use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::TabberSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<TabberSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &TabberSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: TabberSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: TabberSettings::default(),
        }
    }

    fn write_json(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                SettingsError::IoError(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("cannot write {}: {}", path.display(), e)))
    }
}

/// Turns `overlay.scroll_offset` into the JSON pointer of its parent object
/// plus the leaf field name.
fn split_key(key: &str) -> Result<(String, &str), SettingsError> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(SettingsError::InvalidKey(format!("malformed key '{}'", key)));
    }
    let (leaf, parents) = match parts.split_last() {
        Some(split) => split,
        None => return Err(SettingsError::InvalidKey("empty key".to_string())),
    };
    let pointer: String = parents.iter().map(|p| format!("/{}", p)).collect();
    Ok((pointer, *leaf))
}

impl SettingsEngineTrait for SettingsEngine {
    /// Reads the config file. A missing file yields the defaults; a file
    /// that does not parse is an error.
    fn load(&mut self) -> Result<TabberSettings, SettingsError> {
        let path = Path::new(&self.config_path);
        self.settings = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SettingsError::SerializationError(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TabberSettings::default(),
            Err(e) => {
                return Err(SettingsError::IoError(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        self.write_json(Path::new(&self.config_path))
    }

    fn get_settings(&self) -> &TabberSettings {
        &self.settings
    }

    /// Updates one value by dotted key, e.g. `"overlay.presentation_mode"`
    /// or `"shortcuts.dismiss"`, and saves.
    ///
    /// The edited tree must still deserialize as `TabberSettings` and its
    /// shortcut table must build a `ShortcutManager`. Only the `shortcuts`
    /// table accepts keys that do not exist yet.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("empty key".to_string()));
        }
        let (parent, leaf) = split_key(key)?;

        let mut tree = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        let object = tree
            .pointer_mut(&parent)
            .and_then(serde_json::Value::as_object_mut)
            .ok_or_else(|| SettingsError::InvalidKey(format!("no such section in '{}'", key)))?;

        if parent != "/shortcuts" && !object.contains_key(leaf) {
            return Err(SettingsError::InvalidKey(format!("no such setting '{}'", key)));
        }
        object.insert(leaf.to_string(), value);

        let settings: TabberSettings = serde_json::from_value(tree)
            .map_err(|e| SettingsError::InvalidValue(format!("{}: {}", key, e)))?;
        ShortcutManager::from_bindings(&settings.shortcuts)
            .map_err(|e| SettingsError::InvalidValue(format!("{}: {}", key, e)))?;

        self.settings = settings;
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = TabberSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
