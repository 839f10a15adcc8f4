use std::fmt;

// === HostError ===

/// Errors raised by the host's tab and window primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Tab with the given ID was not found.
    TabNotFound(i64),
    /// Window with the given ID was not found.
    WindowNotFound(i64),
    /// The host has no window to act on.
    NoWindow,
    /// The host capability surface could not be reached.
    Unavailable(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::TabNotFound(id) => write!(f, "Tab not found: {}", id),
            HostError::WindowNotFound(id) => write!(f, "Window not found: {}", id),
            HostError::NoWindow => write!(f, "No window available"),
            HostError::Unavailable(msg) => write!(f, "Host unavailable: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

// === BridgeError ===

/// Errors related to command bridge dispatch.
#[derive(Debug)]
pub enum BridgeError {
    /// No entry in the method table has this name.
    UnknownMethod(String),
    /// Positional arguments could not be decoded for the method.
    InvalidArgs(String),
    /// The underlying host call failed.
    Host(HostError),
    /// The bridge answered with the error marker.
    Rejected(String),
    /// A resolved value did not have the expected shape.
    InvalidResponse(String),
    /// The bridge side of the channel is gone.
    Disconnected,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::UnknownMethod(method) => write!(f, "Unknown method: {}", method),
            BridgeError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            BridgeError::Host(err) => write!(f, "Host call failed: {}", err),
            BridgeError::Rejected(msg) => write!(f, "Bridge call rejected: {}", msg),
            BridgeError::InvalidResponse(msg) => write!(f, "Invalid bridge response: {}", msg),
            BridgeError::Disconnected => write!(f, "Bridge disconnected"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for BridgeError {
    fn from(err: HostError) -> Self {
        BridgeError::Host(err)
    }
}

// === ShortcutError ===

/// Errors related to overlay key binding management.
#[derive(Debug)]
pub enum ShortcutError {
    /// Shortcut for the given action was not found.
    NotFound(String),
    /// The shortcut keys conflict with an existing binding.
    Conflict(String),
    /// The provided key combination is invalid.
    InvalidKeys(String),
    /// The action name is not an overlay action.
    UnknownAction(String),
}

impl fmt::Display for ShortcutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutError::NotFound(action) => {
                write!(f, "Shortcut not found for action: {}", action)
            }
            ShortcutError::Conflict(msg) => write!(f, "Shortcut conflict: {}", msg),
            ShortcutError::InvalidKeys(keys) => write!(f, "Invalid shortcut keys: {}", keys),
            ShortcutError::UnknownAction(action) => write!(f, "Unknown action: {}", action),
        }
    }
}

impl std::error::Error for ShortcutError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
