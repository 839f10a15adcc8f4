//! Overlay Controller for FuzzyTabber.
//!
//! Owns the search UI state for one show/hide cycle: visibility, query,
//! ranked results and the selection cursor. Every input returns the
//! `OverlayEffect`s the view layer must apply; bridge calls are among them
//! and are fire-and-forget from the controller's point of view.

pub mod search;

use tracing::debug;

use crate::types::rpc::{BridgeRequest, OpenTabOptions};
use crate::types::settings::{
    OverlaySettings, PresentationMode, SearchSettings, SelectionGuard, TabberSettings,
};
use crate::types::tab::{GroupColor, Tab, TabGroup};

use self::search::TabSearcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// What last moved the selection cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    Keyboard,
    Pointer,
}

/// Named overlay actions that key bindings resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayAction {
    NavigateUp,
    NavigateDown,
    Select,
    SelectToWindow,
    CloseSelected,
    BringToWindow,
    Dismiss,
}

impl OverlayAction {
    pub const ALL: [OverlayAction; 7] = [
        OverlayAction::NavigateUp,
        OverlayAction::NavigateDown,
        OverlayAction::Select,
        OverlayAction::SelectToWindow,
        OverlayAction::CloseSelected,
        OverlayAction::BringToWindow,
        OverlayAction::Dismiss,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OverlayAction::NavigateUp => "navigate_up",
            OverlayAction::NavigateDown => "navigate_down",
            OverlayAction::Select => "select",
            OverlayAction::SelectToWindow => "select_to_window",
            OverlayAction::CloseSelected => "close_selected",
            OverlayAction::BringToWindow => "bring_to_window",
            OverlayAction::Dismiss => "dismiss",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|action| action.name() == name)
    }
}

/// A privileged action the overlay asks the bridge to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCommand {
    OpenTab { tab: Tab, bring_tab_to_window: bool },
    CloseTab { tab: Tab },
}

impl BridgeCommand {
    pub fn to_request(&self) -> BridgeRequest {
        match self {
            BridgeCommand::OpenTab {
                tab,
                bring_tab_to_window,
            } => BridgeRequest::open_tab(
                tab.id,
                OpenTabOptions {
                    bring_tab_to_window: *bring_tab_to_window,
                },
            ),
            BridgeCommand::CloseTab { tab } => BridgeRequest::close_tab(tab),
        }
    }
}

/// Side effects for the view layer, in the order they should be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEffect {
    Mount,
    Unmount,
    Show,
    Hide,
    FocusInput,
    BlurInput,
    ClearInput,
    /// Scroll the result list so row `index` sits `offset` pixels from the
    /// viewport top.
    ScrollToRow { index: usize, offset: f64, smooth: bool },
    Dispatch(BridgeCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBadge {
    pub color: GroupColor,
    pub title: Option<String>,
}

/// Presentation data for one result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRow {
    pub tab_id: Option<i64>,
    pub title: String,
    pub url: String,
    pub fav_icon_url: Option<String>,
    pub selected: bool,
    pub group: Option<GroupBadge>,
    pub other_window: bool,
}

pub struct OverlayController {
    settings: OverlaySettings,
    search_settings: SearchSettings,
    visibility: Visibility,
    query: String,
    cursor: usize,
    last_navigation: NavigationSource,
    snapshot: Vec<Tab>,
    groups: Vec<TabGroup>,
    current_window: Option<i64>,
    searcher: TabSearcher,
    results: Vec<usize>,
}

impl OverlayController {
    pub fn new(settings: OverlaySettings, search_settings: SearchSettings) -> Self {
        let searcher = TabSearcher::new(&[], &search_settings);
        Self {
            settings,
            search_settings,
            visibility: Visibility::Hidden,
            query: String::new(),
            cursor: 0,
            last_navigation: NavigationSource::Keyboard,
            snapshot: Vec::new(),
            groups: Vec::new(),
            current_window: None,
            searcher,
            results: Vec::new(),
        }
    }

    pub fn from_settings(settings: &TabberSettings) -> Self {
        Self::new(settings.overlay.clone(), settings.search.clone())
    }

    // ─── Accessors ───

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_navigation(&self) -> NavigationSource {
        self.last_navigation
    }

    pub fn snapshot(&self) -> &[Tab] {
        &self.snapshot
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Tabs of the ranked result set, best match first.
    pub fn results(&self) -> Vec<&Tab> {
        self.results.iter().map(|&i| &self.snapshot[i]).collect()
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.result_tab(self.cursor)
    }

    fn result_tab(&self, index: usize) -> Option<&Tab> {
        self.results.get(index).map(|&i| &self.snapshot[i])
    }

    // ─── Data intake ───

    /// Replaces the tab snapshot. The query is kept and the cursor clamped
    /// to the new result count.
    pub fn set_snapshot(&mut self, tabs: Vec<Tab>) {
        self.snapshot = tabs;
        self.searcher = TabSearcher::new(&self.snapshot, &self.search_settings);
        self.rerank();
        self.cursor = match self.results.len() {
            0 => 0,
            n => self.cursor.min(n - 1),
        };
    }

    pub fn set_tab_groups(&mut self, groups: Vec<TabGroup>) {
        self.groups = groups;
    }

    /// Sets the window hosting the overlay, used for the "other window" badge.
    pub fn set_current_window(&mut self, window_id: i64) {
        self.current_window = Some(window_id);
    }

    fn rerank(&mut self) {
        self.results = self.searcher.rank(&self.query);
    }

    // ─── Visibility ───

    pub fn toggle(&mut self) -> Vec<OverlayEffect> {
        match self.visibility {
            Visibility::Hidden => self.show(),
            Visibility::Visible => self.exit(),
        }
    }

    /// Shows the overlay with an empty query and the cursor on the first row.
    pub fn show(&mut self) -> Vec<OverlayEffect> {
        if self.is_visible() {
            return vec![OverlayEffect::FocusInput];
        }

        self.visibility = Visibility::Visible;
        self.reset_query();

        let entry = match self.settings.presentation_mode {
            PresentationMode::Injected => OverlayEffect::Mount,
            PresentationMode::Toggle => OverlayEffect::Show,
        };
        vec![entry, OverlayEffect::ClearInput, OverlayEffect::FocusInput]
    }

    pub fn escape(&mut self) -> Vec<OverlayEffect> {
        self.exit()
    }

    pub fn background_click(&mut self) -> Vec<OverlayEffect> {
        self.exit()
    }

    fn exit(&mut self) -> Vec<OverlayEffect> {
        if !self.is_visible() {
            return Vec::new();
        }

        self.visibility = Visibility::Hidden;
        self.reset_query();

        match self.settings.presentation_mode {
            PresentationMode::Injected => vec![OverlayEffect::Unmount],
            PresentationMode::Toggle => vec![
                OverlayEffect::Hide,
                OverlayEffect::BlurInput,
                OverlayEffect::ClearInput,
            ],
        }
    }

    fn reset_query(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.last_navigation = NavigationSource::Keyboard;
        self.rerank();
    }

    // ─── Query & navigation ───

    pub fn set_query(&mut self, text: &str) -> Vec<OverlayEffect> {
        if !self.is_visible() {
            return Vec::new();
        }

        self.query = text.to_string();
        self.rerank();
        self.cursor = 0;
        self.last_navigation = NavigationSource::Keyboard;
        self.keyboard_scroll()
    }

    pub fn move_up(&mut self) -> Vec<OverlayEffect> {
        let n = self.results.len();
        if !self.is_visible() || n == 0 {
            return Vec::new();
        }

        let next = (self.cursor as isize - 1) % n as isize;
        self.cursor = if next >= 0 { next as usize } else { n - 1 };
        self.last_navigation = NavigationSource::Keyboard;
        self.keyboard_scroll()
    }

    pub fn move_down(&mut self) -> Vec<OverlayEffect> {
        let n = self.results.len();
        if !self.is_visible() || n == 0 {
            return Vec::new();
        }

        self.cursor = (self.cursor + 1) % n;
        self.last_navigation = NavigationSource::Keyboard;
        self.keyboard_scroll()
    }

    /// Pointer-driven selection. Never scrolls.
    pub fn hover(&mut self, index: usize) -> Vec<OverlayEffect> {
        if self.is_visible() && index < self.results.len() {
            self.cursor = index;
            self.last_navigation = NavigationSource::Pointer;
        }
        Vec::new()
    }

    fn keyboard_scroll(&self) -> Vec<OverlayEffect> {
        if self.results.is_empty() || self.last_navigation != NavigationSource::Keyboard {
            return Vec::new();
        }
        vec![OverlayEffect::ScrollToRow {
            index: self.cursor,
            offset: self.settings.scroll_offset,
            smooth: self.settings.smooth_scroll,
        }]
    }

    // ─── Actions ───

    /// Opens the selected tab and exits (Enter). `bring` moves it into the
    /// overlay's window first.
    pub fn commit(&mut self, bring: bool) -> Vec<OverlayEffect> {
        self.commit_row(self.cursor, bring, NavigationSource::Keyboard)
    }

    pub fn click(&mut self, index: usize) -> Vec<OverlayEffect> {
        self.commit_row(index, false, NavigationSource::Pointer)
    }

    fn commit_row(
        &mut self,
        index: usize,
        bring: bool,
        source: NavigationSource,
    ) -> Vec<OverlayEffect> {
        if !self.is_visible() {
            return Vec::new();
        }
        let tab = match self.result_tab(index) {
            Some(tab) => tab.clone(),
            None => return Vec::new(),
        };

        if tab.id.is_none() {
            let exits = match self.settings.selection_guard {
                SelectionGuard::RequireIdentifier => false,
                SelectionGuard::CloseWithoutCall => true,
                SelectionGuard::CloseOnEnter => source == NavigationSource::Keyboard,
            };
            if !exits {
                debug!(row = index, ?source, "ignoring selection of tab without id");
                return Vec::new();
            }
            return self.exit();
        }

        debug!(tab_id = ?tab.id, bring, "committing selection");
        let mut effects = vec![OverlayEffect::Dispatch(BridgeCommand::OpenTab {
            tab,
            bring_tab_to_window: bring,
        })];
        effects.extend(self.exit());
        effects
    }

    /// Closes the selected tab; the overlay stays open.
    pub fn close_selected(&mut self) -> Vec<OverlayEffect> {
        match self.selected_with_id() {
            Some(tab) => vec![OverlayEffect::Dispatch(BridgeCommand::CloseTab { tab })],
            None => Vec::new(),
        }
    }

    /// Moves the selected tab into the overlay's window; the overlay stays open.
    pub fn bring_selected(&mut self) -> Vec<OverlayEffect> {
        match self.selected_with_id() {
            Some(tab) => vec![OverlayEffect::Dispatch(BridgeCommand::OpenTab {
                tab,
                bring_tab_to_window: true,
            })],
            None => Vec::new(),
        }
    }

    fn selected_with_id(&self) -> Option<Tab> {
        if !self.is_visible() {
            return None;
        }
        self.selected_tab().filter(|tab| tab.id.is_some()).cloned()
    }

    pub fn handle_action(&mut self, action: OverlayAction) -> Vec<OverlayEffect> {
        match action {
            OverlayAction::NavigateUp => self.move_up(),
            OverlayAction::NavigateDown => self.move_down(),
            OverlayAction::Select => self.commit(false),
            OverlayAction::SelectToWindow => self.commit(true),
            OverlayAction::CloseSelected => self.close_selected(),
            OverlayAction::BringToWindow => self.bring_selected(),
            OverlayAction::Dismiss => self.escape(),
        }
    }

    // ─── Rendering ───

    pub fn rows(&self) -> Vec<TabRow> {
        self.results
            .iter()
            .enumerate()
            .map(|(row, &i)| {
                let tab = &self.snapshot[i];
                TabRow {
                    tab_id: tab.id,
                    title: tab
                        .title
                        .as_deref()
                        .filter(|t| !t.is_empty())
                        .unwrap_or("No title")
                        .to_string(),
                    url: tab.url.clone().unwrap_or_default(),
                    fav_icon_url: tab.fav_icon_url.clone(),
                    selected: row == self.cursor,
                    group: tab.group_id.and_then(|gid| self.group_badge(gid)),
                    other_window: self
                        .current_window
                        .map(|w| w != tab.window_id)
                        .unwrap_or(false),
                }
            })
            .collect()
    }

    fn group_badge(&self, group_id: i64) -> Option<GroupBadge> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .map(|g| GroupBadge {
                color: g.color,
                title: g.title.clone(),
            })
    }
}
