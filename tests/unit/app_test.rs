//! End-to-end tests of the app shell against a served bridge.

use fuzzytabber::app::App;
use fuzzytabber::bridge::channel::{channel, serve, BridgeHandle};
use fuzzytabber::bridge::CommandBridge;
use fuzzytabber::managers::tab_manager::{MemoryHost, TabHost};
use fuzzytabber::overlay::OverlayEffect;
use fuzzytabber::types::errors::{BridgeError, HostError};
use fuzzytabber::types::settings::{RefreshPolicy, SelectionGuard, TabberSettings};
use fuzzytabber::types::tab::{
    GroupColor, MoveIndex, Tab, TabGroup, TabUpdate, Window, WindowUpdate,
};
use tokio::task::JoinHandle;

/// Window 1: GitHub, Gmail (grouped), Google Docs, an id-less tab.
/// Window 2: crates.io (id 4).
fn setup_host() -> MemoryHost {
    let host = MemoryHost::new();
    let w1 = host.open_window().unwrap();
    let w2 = host.open_window().unwrap();
    host.create_tab(w1, "GitHub", "https://github.com").unwrap();
    let gmail = host.create_tab(w1, "Gmail", "https://mail.google.com").unwrap();
    host.create_tab(w1, "Google Docs", "https://docs.google.com").unwrap();
    host.insert_tab(Tab {
        id: None,
        title: Some("Extensions".to_string()),
        url: Some("chrome://extensions".to_string()),
        window_id: w1,
        ..Tab::default()
    })
    .unwrap();
    host.create_tab(w2, "crates.io", "https://crates.io").unwrap();
    host.add_group(TabGroup {
        id: 1,
        color: GroupColor::Blue,
        title: Some("Mail".to_string()),
    })
    .unwrap();
    host.set_tab_group(gmail, Some(1)).unwrap();
    host
}

fn spawn_bridge(
    host: &MemoryHost,
    policy: RefreshPolicy,
) -> (BridgeHandle, JoinHandle<CommandBridge<MemoryHost>>) {
    let events = host.subscribe().unwrap();
    let mut bridge = CommandBridge::new(host.clone(), policy);
    bridge.start();
    let (handle, inbox) = channel();
    (handle, tokio::spawn(serve(bridge, inbox, Some(events))))
}

fn titles(app: &App) -> Vec<String> {
    app.overlay.rows().into_iter().map(|row| row.title).collect()
}

#[tokio::test]
async fn test_refresh_loads_tabs_groups_and_window() {
    let host = setup_host();
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();

    app.refresh().await.unwrap();
    app.toggle();

    let rows = app.overlay.rows();
    assert_eq!(
        titles(&app),
        vec!["GitHub", "Gmail", "Google Docs", "Extensions", "crates.io"]
    );
    assert_eq!(rows[1].group.as_ref().map(|g| g.color), Some(GroupColor::Blue));
    assert!(!rows[0].other_window);
    assert!(rows[4].other_window);

    drop(app);
    server.await.unwrap();
}

#[tokio::test]
async fn test_refresh_learns_window_when_unknown() {
    let host = setup_host();
    host.update_window(
        2,
        WindowUpdate {
            focused: Some(true),
        },
    )
    .unwrap();
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(TabberSettings::default(), handle, None).unwrap();

    app.refresh().await.unwrap();
    let rows = app.overlay.rows();
    assert!(rows[0].other_window);
    assert!(!rows[4].other_window);

    drop(app);
    server.await.unwrap();
}

#[tokio::test]
async fn test_typing_ranks_and_navigating_scrolls() {
    let host = setup_host();
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();
    app.refresh().await.unwrap();
    app.toggle();

    app.input("goo");
    let ranked = titles(&app);
    assert!(ranked.contains(&"Google Docs".to_string()));
    assert!(ranked.contains(&"Gmail".to_string()));
    assert!(!ranked.contains(&"GitHub".to_string()));

    let effects = app.key("Down");
    assert!(matches!(
        effects.as_slice(),
        [OverlayEffect::ScrollToRow { index: 1, .. }]
    ));
    assert!(app.key("Ctrl+Shift+Up").is_empty());

    drop(app);
    server.await.unwrap();
}

#[tokio::test]
async fn test_close_chord_removes_tab_and_keeps_overlay_open() {
    let host = setup_host();
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();
    app.refresh().await.unwrap();
    app.toggle();

    app.input("docs");
    assert_eq!(titles(&app), vec!["Google Docs"]);

    let effects = app.key("Ctrl+Down");
    assert!(effects.is_empty());
    assert!(app.overlay.is_visible());

    app.refresh().await.unwrap();
    assert!(app.overlay.is_visible());
    assert_eq!(app.overlay.query(), "docs");
    assert_eq!(app.overlay.result_count(), 0);
    assert!(app
        .overlay
        .snapshot()
        .iter()
        .all(|t| t.title.as_deref() != Some("Google Docs")));

    drop(app);
    server.await.unwrap();
    assert_eq!(host.tab_count(), 4);
}

#[tokio::test]
async fn test_enter_activates_tab_and_exits() {
    let host = setup_host();
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();
    app.refresh().await.unwrap();
    app.toggle();

    app.input("crates");
    assert_eq!(app.key("Enter"), vec![OverlayEffect::Unmount]);
    assert!(!app.overlay.is_visible());

    drop(app);
    server.await.unwrap();
    let crates = host.get_tab(4).unwrap();
    assert!(crates.active);
    assert_eq!(crates.window_id, 2);
    assert_eq!(host.current_window().unwrap().id, 2);
}

#[tokio::test]
async fn test_shift_enter_brings_tab_to_overlay_window() {
    let host = setup_host();
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Pull);
    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();
    app.refresh().await.unwrap();
    app.toggle();

    app.input("crates");
    app.key("Shift+Enter");

    drop(app);
    server.await.unwrap();
    let crates = host.get_tab(4).unwrap();
    assert_eq!(crates.window_id, 1);
    assert_eq!(crates.index, 4);
    assert!(crates.active);
}

#[tokio::test]
async fn test_clicking_tab_without_id_respects_guard() {
    let host = setup_host();

    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();
    app.refresh().await.unwrap();
    app.toggle();
    assert!(app.click(3).is_empty());
    assert!(app.overlay.is_visible());
    drop(app);
    server.await.unwrap();

    let mut settings = TabberSettings::default();
    settings.overlay.selection_guard = SelectionGuard::CloseWithoutCall;
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(settings, handle, Some(1)).unwrap();
    app.refresh().await.unwrap();
    app.toggle();
    assert_eq!(app.click(3), vec![OverlayEffect::Unmount]);
    drop(app);
    server.await.unwrap();

    assert_eq!(host.tab_count(), 5);
}

#[tokio::test]
async fn test_hover_and_background_click() {
    let host = setup_host();
    let (handle, server) = spawn_bridge(&host, RefreshPolicy::Push);
    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();
    app.refresh().await.unwrap();
    app.toggle();

    assert!(app.hover(2).is_empty());
    assert_eq!(app.overlay.cursor(), 2);
    assert_eq!(app.background_click(), vec![OverlayEffect::Unmount]);

    drop(app);
    server.await.unwrap();
}

#[tokio::test]
async fn test_invalid_shortcut_settings_rejected() {
    let (handle, _inbox) = channel();
    let mut settings = TabberSettings::default();
    settings
        .shortcuts
        .insert("teleport".to_string(), "Ctrl+T".to_string());
    assert!(App::new(settings, handle, None).is_err());
}

/// Host that serves one window and refuses every tab query.
struct BrokenHost;

impl TabHost for BrokenHost {
    fn query_tabs(&self) -> Result<Vec<Tab>, HostError> {
        Err(HostError::Unavailable("tabs api gone".to_string()))
    }
    fn get_tab(&self, tab_id: i64) -> Result<Tab, HostError> {
        Err(HostError::TabNotFound(tab_id))
    }
    fn update_tab(&self, tab_id: i64, _update: TabUpdate) -> Result<(), HostError> {
        Err(HostError::TabNotFound(tab_id))
    }
    fn move_tab(&self, tab_id: i64, _window_id: i64, _index: MoveIndex) -> Result<(), HostError> {
        Err(HostError::TabNotFound(tab_id))
    }
    fn current_window(&self) -> Result<Window, HostError> {
        Ok(Window {
            id: 1,
            focused: true,
        })
    }
    fn get_window(&self, window_id: i64) -> Result<Window, HostError> {
        Ok(Window {
            id: window_id,
            focused: window_id == 1,
        })
    }
    fn update_window(&self, _window_id: i64, _update: WindowUpdate) -> Result<(), HostError> {
        Ok(())
    }
    fn query_tab_groups(&self) -> Result<Vec<TabGroup>, HostError> {
        Ok(Vec::new())
    }
    fn remove_tab(&self, tab_id: i64) -> Result<(), HostError> {
        Err(HostError::TabNotFound(tab_id))
    }
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_tabs() {
    let bridge = CommandBridge::new(BrokenHost, RefreshPolicy::Pull);
    let (handle, inbox) = channel();
    let server = tokio::spawn(serve(bridge, inbox, None));

    let mut app = App::new(TabberSettings::default(), handle, Some(1)).unwrap();
    app.overlay
        .set_snapshot(vec![Tab::new(1, 1, "Cached", "https://cached.example")]);

    let result = app.refresh().await;
    assert!(matches!(result, Err(BridgeError::Rejected(_))));
    assert_eq!(app.overlay.snapshot().len(), 1);

    drop(app);
    server.await.unwrap();
}
