//! FuzzyTabber: a keyboard-driven fuzzy tab switcher.
//!
//! Entry point: runs a scripted console session against an in-memory browser,
//! driving the overlay through the same bridge channel a real host would use.

use fuzzytabber::app::App;
use fuzzytabber::bridge::channel::{channel, serve};
use fuzzytabber::bridge::CommandBridge;
use fuzzytabber::managers::tab_manager::{MemoryHost, TabHost};
use fuzzytabber::overlay::OverlayEffect;
use fuzzytabber::services::logging;
use fuzzytabber::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use fuzzytabber::types::errors::HostError;
use fuzzytabber::types::tab::{GroupColor, Tab, TabGroup};

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_effects(effects: &[OverlayEffect]) {
    for effect in effects {
        println!("  effect: {:?}", effect);
    }
}

fn print_rows(app: &App) {
    println!("  query: {:?}", app.overlay.query());
    for row in app.overlay.rows() {
        let marker = if row.selected { ">" } else { " " };
        let group = row
            .group
            .map(|g| format!(" [{}:{}]", g.color.as_str(), g.title.unwrap_or_default()))
            .unwrap_or_default();
        let other = if row.other_window { " [Other window]" } else { "" };
        println!("  {} {} - {}{}{}", marker, row.title, row.url, group, other);
    }
}

/// Two windows with a handful of tabs, one group and one privileged tab.
fn demo_host() -> Result<(MemoryHost, i64), HostError> {
    let host = MemoryHost::new();
    let main_window = host.open_window()?;
    let side_window = host.open_window()?;

    host.create_tab(main_window, "GitHub", "https://github.com")?;
    let gmail = host.create_tab(main_window, "Gmail", "https://mail.google.com")?;
    host.create_tab(main_window, "Google Docs", "https://docs.google.com")?;
    host.create_tab(side_window, "The Rust Programming Language", "https://doc.rust-lang.org/book")?;
    host.create_tab(side_window, "crates.io", "https://crates.io")?;
    host.insert_tab(Tab {
        id: None,
        title: Some("Extensions".to_string()),
        url: Some("chrome://extensions".to_string()),
        window_id: main_window,
        ..Tab::default()
    })?;

    host.add_group(TabGroup {
        id: 1,
        color: GroupColor::Blue,
        title: Some("Mail".to_string()),
    })?;
    host.set_tab_group(gmail, Some(1))?;

    Ok((host, main_window))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = SettingsEngine::new(std::env::var("FUZZYTABBER_CONFIG").ok());
    let settings = engine.load()?;
    logging::init(&settings.logging.level);

    println!();
    println!("  FuzzyTabber v{} (demo mode)", env!("CARGO_PKG_VERSION"));
    println!();

    let (host, main_window) = demo_host()?;
    let events = host.subscribe()?;
    let mut bridge = CommandBridge::new(host.clone(), settings.bridge.refresh_policy);
    bridge.start();

    let (handle, inbox) = channel();
    let server = tokio::spawn(serve(bridge, inbox, Some(events)));

    let mut app = App::new(settings, handle, Some(main_window))?;
    app.refresh().await?;

    section("Toggle overlay");
    print_effects(&app.toggle());
    print_rows(&app);

    section("Type \"goo\"");
    print_effects(&app.input("goo"));
    print_rows(&app);

    section("Navigate: Down, Down, Up");
    for key in ["Down", "Down", "Up"] {
        print_effects(&app.key(key));
    }
    print_rows(&app);

    section("Close selected tab (Ctrl+Down)");
    print_effects(&app.key("Ctrl+Down"));
    app.refresh().await?;
    print_rows(&app);

    section("Clear query, hover the side window's first tab, Enter");
    app.input("");
    app.hover(3);
    print_effects(&app.key("Enter"));
    println!("  visible after commit: {}", app.overlay.is_visible());

    drop(app);
    let bridge = server.await?;

    section("Host state");
    for tab in bridge.host().query_tabs()? {
        let active = if tab.active { "*" } else { " " };
        println!(
            "  {} window {} #{} {}",
            active,
            tab.window_id,
            tab.index,
            tab.title.unwrap_or_default()
        );
    }
    println!("  focused window: {}", bridge.host().current_window()?.id);
    println!();
    Ok(())
}
