//! Property-based tests for overlay cursor navigation.

use fuzzytabber::overlay::{NavigationSource, OverlayController, OverlayEffect};
use fuzzytabber::types::settings::{OverlaySettings, SearchSettings};
use fuzzytabber::types::tab::Tab;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Input {
    Up,
    Down,
    Hover(usize),
    Query(String),
}

fn arb_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        Just(Input::Up),
        Just(Input::Down),
        (0usize..40).prop_map(Input::Hover),
        "[a-z0-9 ]{0,3}".prop_map(Input::Query),
    ]
}

fn overlay_with(n: usize) -> OverlayController {
    let tabs = (0..n)
        .map(|i| {
            Tab::new(
                i as i64 + 1,
                1,
                &format!("tab {}", i),
                &format!("https://site{}.example", i),
            )
        })
        .collect();
    let mut overlay = OverlayController::new(OverlaySettings::default(), SearchSettings::default());
    overlay.set_snapshot(tabs);
    overlay.show();
    overlay
}

fn apply(overlay: &mut OverlayController, input: &Input) -> Vec<OverlayEffect> {
    match input {
        Input::Up => overlay.move_up(),
        Input::Down => overlay.move_down(),
        Input::Hover(row) => overlay.hover(*row),
        Input::Query(text) => overlay.set_query(text),
    }
}

fn is_scroll(effects: &[OverlayEffect]) -> bool {
    matches!(effects, [OverlayEffect::ScrollToRow { .. }])
}

proptest! {
    #[test]
    fn prop_down_n_times_returns_to_start(n in 1usize..30, start in 0usize..30) {
        let start = start % n;
        let mut overlay = overlay_with(n);
        overlay.hover(start);

        for _ in 0..n {
            overlay.move_down();
        }
        prop_assert_eq!(overlay.cursor(), start);
    }

    #[test]
    fn prop_up_from_first_row_wraps_to_last(n in 1usize..30) {
        let mut overlay = overlay_with(n);
        overlay.move_up();
        prop_assert_eq!(overlay.cursor(), n - 1);
    }

    #[test]
    fn prop_up_undoes_down(n in 1usize..30, start in 0usize..30) {
        let start = start % n;
        let mut overlay = overlay_with(n);
        overlay.hover(start);
        overlay.move_down();
        overlay.move_up();
        prop_assert_eq!(overlay.cursor(), start);
    }

    #[test]
    fn prop_cursor_stays_in_bounds(
        n in 0usize..20,
        inputs in prop::collection::vec(arb_input(), 0..40),
    ) {
        let mut overlay = overlay_with(n);
        for input in &inputs {
            apply(&mut overlay, input);
            let count = overlay.result_count();
            if count == 0 {
                prop_assert_eq!(overlay.cursor(), 0);
            } else {
                prop_assert!(overlay.cursor() < count);
            }
        }
    }

    #[test]
    fn prop_query_edit_resets_cursor(
        n in 1usize..20,
        inputs in prop::collection::vec(arb_input(), 0..20),
        query in "[a-z0-9 ]{0,3}",
    ) {
        let mut overlay = overlay_with(n);
        for input in &inputs {
            apply(&mut overlay, input);
        }
        overlay.set_query(&query);
        prop_assert_eq!(overlay.cursor(), 0);
        prop_assert_eq!(overlay.last_navigation(), NavigationSource::Keyboard);
    }

    #[test]
    fn prop_keyboard_scrolls_pointer_never_does(
        n in 1usize..20,
        inputs in prop::collection::vec(arb_input(), 0..40),
    ) {
        let mut overlay = overlay_with(n);
        for input in &inputs {
            let effects = apply(&mut overlay, input);
            match input {
                Input::Hover(_) => prop_assert!(effects.is_empty()),
                _ => prop_assert_eq!(is_scroll(&effects), overlay.result_count() > 0),
            }
        }
    }
}
