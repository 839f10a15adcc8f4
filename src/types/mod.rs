// FuzzyTabber shared type definitions
// Each submodule defines types used by both the bridge and the overlay.

pub mod errors;
pub mod rpc;
pub mod settings;
pub mod tab;
