// FuzzyTabber state managers
// Managers handle stateful operations: the host's tabs and windows, and overlay key bindings.

pub mod shortcut_manager;
pub mod tab_manager;
