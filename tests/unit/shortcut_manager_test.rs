//! Unit tests for overlay key bindings: chord normalization, defaults,
//! conflicts and resolution.

use fuzzytabber::managers::shortcut_manager::{
    normalize_keys, ShortcutManager, ShortcutManagerTrait,
};
use fuzzytabber::overlay::OverlayAction;
use fuzzytabber::types::errors::ShortcutError;
use fuzzytabber::types::settings::TabberSettings;
use rstest::rstest;

// ─── Normalization ───

#[rstest]
#[case("ctrl+down", "Ctrl+Down")]
#[case("Control+ArrowDown", "Ctrl+Down")]
#[case("shift+ctrl+enter", "Ctrl+Shift+Enter")]
#[case("cmd+alt+k", "Alt+Meta+K")]
#[case("Esc", "Escape")]
#[case("return", "Enter")]
#[case(" Ctrl + Left ", "Ctrl+Left")]
#[case("ctrl+ctrl+x", "Ctrl+X")]
fn test_normalize_keys(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_keys(input).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("Ctrl+")]
#[case("Ctrl+Shift")]
#[case("A+B")]
#[case("++")]
fn test_normalize_rejects_invalid_chords(#[case] input: &str) {
    assert!(matches!(
        normalize_keys(input),
        Err(ShortcutError::InvalidKeys(_))
    ));
}

// ─── Defaults ───

#[rstest]
#[case("Up", OverlayAction::NavigateUp)]
#[case("arrowdown", OverlayAction::NavigateDown)]
#[case("Enter", OverlayAction::Select)]
#[case("shift+enter", OverlayAction::SelectToWindow)]
#[case("ctrl+down", OverlayAction::CloseSelected)]
#[case("Control+ArrowLeft", OverlayAction::BringToWindow)]
#[case("esc", OverlayAction::Dismiss)]
fn test_default_bindings_resolve(#[case] keys: &str, #[case] action: OverlayAction) {
    let mgr = ShortcutManager::new();
    assert_eq!(mgr.resolve(keys), Some(action));
}

#[test]
fn test_unbound_chord_resolves_to_none() {
    let mgr = ShortcutManager::new();
    assert_eq!(mgr.resolve("Ctrl+Up"), None);
    assert_eq!(mgr.resolve("Ctrl+"), None);
}

#[test]
fn test_every_action_has_a_default() {
    let mgr = ShortcutManager::new();
    for action in OverlayAction::ALL {
        assert!(mgr.get_shortcut(action.name()).is_some(), "{}", action.name());
    }
    assert_eq!(mgr.list_shortcuts().len(), OverlayAction::ALL.len());
}

#[test]
fn test_from_default_settings_matches_new() {
    let from_settings = ShortcutManager::from_bindings(&TabberSettings::default().shortcuts).unwrap();
    assert_eq!(from_settings.list_shortcuts(), ShortcutManager::new().list_shortcuts());
}

// ─── Registration ───

#[test]
fn test_register_normalizes_and_rebinds() {
    let mut mgr = ShortcutManager::new();
    mgr.register_shortcut("dismiss", "ctrl+q").unwrap();

    assert_eq!(mgr.get_shortcut("dismiss"), Some("Ctrl+Q"));
    assert_eq!(mgr.resolve("Ctrl+Q"), Some(OverlayAction::Dismiss));
    assert_eq!(mgr.resolve("Escape"), None);
}

#[test]
fn test_register_conflict() {
    let mut mgr = ShortcutManager::new();
    let result = mgr.register_shortcut("dismiss", "control+arrowdown");
    match result {
        Err(ShortcutError::Conflict(msg)) => {
            assert!(msg.contains("Ctrl+Down"));
            assert!(msg.contains("close_selected"));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(mgr.get_shortcut("dismiss"), Some("Escape"));
}

#[test]
fn test_rebinding_same_action_is_not_a_conflict() {
    let mut mgr = ShortcutManager::new();
    mgr.register_shortcut("close_selected", "Ctrl+ArrowDown").unwrap();
    assert_eq!(mgr.get_shortcut("close_selected"), Some("Ctrl+Down"));
}

#[test]
fn test_register_unknown_action() {
    let mut mgr = ShortcutManager::new();
    assert!(matches!(
        mgr.register_shortcut("reload", "F5"),
        Err(ShortcutError::UnknownAction(_))
    ));
}

#[test]
fn test_register_empty_keys() {
    let mut mgr = ShortcutManager::new();
    assert!(matches!(
        mgr.register_shortcut("dismiss", "   "),
        Err(ShortcutError::InvalidKeys(_))
    ));
}

#[test]
fn test_from_bindings_rejects_conflicts() {
    let mut bindings = TabberSettings::default().shortcuts;
    bindings.insert("dismiss".to_string(), "Enter".to_string());
    assert!(matches!(
        ShortcutManager::from_bindings(&bindings),
        Err(ShortcutError::Conflict(_))
    ));
}

#[test]
fn test_unregister_and_reset() {
    let mut mgr = ShortcutManager::new();
    mgr.unregister_shortcut("bring_to_window").unwrap();
    assert_eq!(mgr.resolve("Ctrl+Left"), None);
    assert!(matches!(
        mgr.unregister_shortcut("bring_to_window"),
        Err(ShortcutError::NotFound(_))
    ));

    mgr.reset_to_defaults().unwrap();
    assert_eq!(mgr.resolve("Ctrl+Left"), Some(OverlayAction::BringToWindow));
}

#[test]
fn test_has_conflict_excludes_action() {
    let mgr = ShortcutManager::new();
    assert_eq!(mgr.has_conflict("escape", None), Some("dismiss".to_string()));
    assert_eq!(mgr.has_conflict("escape", Some("dismiss")), None);
    assert_eq!(mgr.has_conflict("F1", None), None);
}
