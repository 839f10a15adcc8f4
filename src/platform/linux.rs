// FuzzyTabber platform paths for Linux
// Config: ~/.config/fuzzytabber

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory on Linux.
/// Uses `$XDG_CONFIG_HOME/fuzzytabber` if set, otherwise `~/.config/fuzzytabber`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("fuzzytabber")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("fuzzytabber")
    }
}
