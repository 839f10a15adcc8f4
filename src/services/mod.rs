// FuzzyTabber services
// Stateless or file-backed concerns shared by the binaries: settings and logging.

pub mod logging;
pub mod settings_engine;
