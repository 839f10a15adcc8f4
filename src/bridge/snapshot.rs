use crate::types::tab::Tab;

/// The bridge's cached view of every open tab.
///
/// Replaced wholesale on refresh; only the bridge itself can write it.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    tabs: Vec<Tab>,
    generation: u64,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Number of refreshes applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(super) fn replace(&mut self, tabs: Vec<Tab>) {
        self.tabs = tabs;
        self.generation += 1;
    }
}
