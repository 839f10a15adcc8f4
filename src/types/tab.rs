use serde::{Deserialize, Serialize};

/// A browser tab as reported by the host.
///
/// `id` is absent for privileged tabs the host refuses to expose; such tabs
/// still show up in the snapshot but cannot be activated or closed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    pub window_id: i64,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub highlighted: bool,
}

impl Tab {
    pub fn new(id: i64, window_id: i64, title: &str, url: &str) -> Self {
        Self {
            id: Some(id),
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            window_id,
            ..Self::default()
        }
    }
}

/// Named colors a tab group can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl GroupColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupColor::Grey => "grey",
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Orange => "orange",
        }
    }
}

/// A tab group. Read-only from the overlay's side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabGroup {
    pub id: i64,
    pub color: GroupColor,
    #[serde(default)]
    pub title: Option<String>,
}

/// A browser window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Window {
    pub id: i64,
    #[serde(default)]
    pub focused: bool,
}

/// Fields the host can change on an existing tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub active: Option<bool>,
    pub highlighted: Option<bool>,
}

/// Fields the host can change on an existing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowUpdate {
    pub focused: Option<bool>,
}

/// Target position for a tab move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIndex {
    /// After every other tab in the target window.
    Last,
    At(usize),
}
