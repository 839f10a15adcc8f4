//! FuzzyTabber: a keyboard-driven fuzzy tab switcher.
//!
//! This library crate exposes the overlay controller, the command bridge and
//! their supporting types for use by the binaries and integration tests.

pub mod app;
pub mod bridge;
pub mod managers;
pub mod overlay;
pub mod platform;
pub mod services;
pub mod types;
